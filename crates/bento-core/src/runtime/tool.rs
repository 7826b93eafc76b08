//! External tools: the package manager and the project's task runner
//!
//! Both are child processes. Their failures are reported through exit codes
//! rather than errors, since the scaffold's text edits don't depend on them.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for dependency installation (10 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Task runner a Bento project ships in its dev dependencies
pub const LOCAL_TASK_RUNNER: &str = "node_modules/.bin/gulp";

/// Marker file of an existing Bento project
pub const PROJECT_MARKER: &str = "gulpfile.js";

/// Check if a binary is available in PATH
pub fn command_exists(name: &str) -> bool {
    std::process::Command::new("which")
        .arg(name)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Package manager used to install a project's development tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl PackageManager {
    /// Prefer yarn when it is on PATH, otherwise npm
    pub fn detect() -> Self {
        if command_exists("yarn") {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    pub fn args(&self) -> &'static [&'static str] {
        match self {
            PackageManager::Yarn => &[],
            PackageManager::Npm => &["install"],
        }
    }

    /// Command line shown to the operator
    pub fn command_line(&self) -> String {
        std::iter::once(self.program())
            .chain(self.args().iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Install dependencies in `project_root`, streaming output.
    /// Returns the exit code (`None` when killed by a signal).
    pub async fn install(&self, project_root: &Path) -> Result<Option<i32>> {
        let cmd = self.command_line();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(self.program())
            .args(self.args())
            .current_dir(project_root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow::anyhow!("Failed to capture stderr"))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        // Stream both pipes until each has closed
        let output_task = async {
            let mut stdout_open = true;
            let mut stderr_open = true;
            while stdout_open || stderr_open {
                tokio::select! {
                    line = stdout_reader.next_line(), if stdout_open => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => stdout_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                stdout_open = false;
                            }
                        }
                    }
                    line = stderr_reader.next_line(), if stderr_open => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => stderr_open = false,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                                stderr_open = false;
                            }
                        }
                    }
                }
            }
        };

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            anyhow::bail!(
                "{} timed out after {} seconds",
                cmd,
                INSTALL_TIMEOUT.as_secs()
            );
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for {}", cmd))?;
        println!();
        println!("Exited with code {}", status.code().unwrap_or(-1));
        Ok(status.code())
    }
}

/// Whether `dir` already is a Bento project
pub fn is_bento_project(dir: &Path) -> bool {
    dir.join(PROJECT_MARKER).is_file()
}

/// Run the project's own task runner with inherited stdio and pass its
/// exit code through
pub async fn run_task_runner(project_root: &Path) -> Result<i32> {
    let runner = project_root.join(LOCAL_TASK_RUNNER);
    if !runner.exists() {
        anyhow::bail!(
            "{} not found. Install the project's dependencies first.",
            runner.display()
        );
    }

    let status = TokioCommand::new(&runner)
        .current_dir(project_root)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to run {}", runner.display()))?;

    Ok(status.code().unwrap_or(1))
}

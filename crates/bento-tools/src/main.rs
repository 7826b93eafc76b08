//! Bento CLI - Project scaffolding for Bento games

use anyhow::Result;
use bento_core::{ProductConfig, Variant};
use clap::Parser;
use std::path::Path;

/// Bento product configuration
#[derive(Clone)]
pub struct BentoConfig;

impl ProductConfig for BentoConfig {
    fn name(&self) -> &'static str {
        "bento"
    }

    fn display_name(&self) -> &'static str {
        "Bento"
    }

    fn default_archive_url(&self) -> &'static str {
        "https://github.com/LuckyKat/Bento-Empty-Project/archive/{branch}.zip"
    }

    fn archive_url_env(&self) -> &'static str {
        "BENTO_TEMPLATE_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://luckykat.github.io/Bento/"
    }

    fn next_steps(&self, dir: &Path, _variant: Variant) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: the bento command lists development tasks inside a project
        steps.push("Run `bento` to view development tasks".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "bento")]
#[command(about = "CLI for scaffolding Bento game projects")]
#[command(version)]
pub struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let _args = Args::parse();
    let config = BentoConfig;

    let result = bento_core::run(&config).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_url_per_variant() {
        let config = BentoConfig;
        if std::env::var(config.archive_url_env()).is_ok() {
            return;
        }
        assert_eq!(
            config.archive_url(Variant::TwoD),
            "https://github.com/LuckyKat/Bento-Empty-Project/archive/master.zip"
        );
        assert!(config.archive_url(Variant::ThreeD).ends_with("/3d.zip"));
    }

    #[test]
    fn test_next_steps_mentions_project() {
        let steps = BentoConfig.next_steps(Path::new("/tmp/cool-game"), Variant::TwoD);
        assert_eq!(steps[0], "cd /tmp/cool-game");
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_args_parse_without_flags() {
        assert!(Args::try_parse_from(["bento"]).is_ok());
        assert!(Args::try_parse_from(["bento", "--unknown"]).is_err());
    }
}

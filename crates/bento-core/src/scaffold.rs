//! Scaffold orchestration
//!
//! A [`ScaffoldContext`] is threaded by value through each stage. Every stage
//! finishes all of its I/O before returning the updated context, so the
//! pipeline has exactly one linear control path:
//!
//! `Downloading -> Expanding -> Renaming -> Installing -> Customizing ->
//! Cleaning -> CheckingModules -> [MergingModules] -> Done`

use crate::error::ScaffoldError;
use crate::fs::CopyOptions;
use crate::modules::{self, MergeReport};
use crate::product::ProductConfig;
use crate::request::ProjectRequest;
use crate::runtime::PackageManager;
use crate::templates::{clean_provenance, customize, expand_archive, SubstitutionTable};
use crate::templates::fetcher::TemplateFetcher;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Pipeline position; each value names the stage that runs next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Downloading,
    Expanding,
    Renaming,
    Installing,
    Customizing,
    Cleaning,
    CheckingModules,
    MergingModules,
    Done,
}

/// Result of the dependency install stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Install disabled or no package manifest in the project
    Skipped,
    Succeeded,
    /// Package manager exited non-zero (`None` when killed by a signal)
    Failed(Option<i32>),
    /// Package manager could not be run at all
    Unavailable(String),
}

/// State carried from one stage to the next
#[derive(Debug, Clone)]
pub struct ScaffoldContext {
    pub cwd: PathBuf,
    pub request: ProjectRequest,
    /// `<cwd>/<project name>`
    pub project_root: PathBuf,
    pub stage: Stage,
    /// Archive bytes between download and expansion
    archive: Option<Vec<u8>>,
    /// Top-level archive folder between expansion and rename
    archive_root: Option<PathBuf>,
    pub install: Option<InstallOutcome>,
    pub customized: Vec<PathBuf>,
}

impl ScaffoldContext {
    /// Start a scaffold in `cwd`. Fails with a conflict, before anything is
    /// written, if the project folder already exists.
    pub fn new(cwd: impl Into<PathBuf>, request: ProjectRequest) -> Result<Self, ScaffoldError> {
        let cwd = cwd.into();
        let project_root = cwd.join(&request.project_name);
        ensure_absent(&project_root)?;
        Ok(Self {
            cwd,
            request,
            project_root,
            stage: Stage::Downloading,
            archive: None,
            archive_root: None,
            install: None,
            customized: Vec::new(),
        })
    }

    fn expect_stage(&self, stage: Stage) -> Result<()> {
        if self.stage != stage {
            anyhow::bail!("Scaffold is at {:?}, expected {:?}", self.stage, stage);
        }
        Ok(())
    }
}

fn ensure_absent(path: &Path) -> Result<(), ScaffoldError> {
    if path.exists() {
        return Err(ScaffoldError::Conflict {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Knobs for a scaffold run
#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    /// Run the package manager after renaming
    pub install: bool,
    /// Package manager override; detected when `None`
    pub package_manager: Option<PackageManager>,
    /// Options for module asset copies
    pub copy: CopyOptions,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            install: true,
            package_manager: None,
            copy: CopyOptions::new().exclude(".DS_Store"),
        }
    }
}

/// Runs the scaffold stages against one template source
pub struct Scaffolder {
    fetcher: TemplateFetcher,
    table: SubstitutionTable,
    options: ScaffoldOptions,
}

impl Scaffolder {
    pub fn new(fetcher: TemplateFetcher, table: SubstitutionTable, options: ScaffoldOptions) -> Self {
        Self {
            fetcher,
            table,
            options,
        }
    }

    /// Scaffolder for a request's variant, using the substitution table
    /// found in `cwd` (or the built-in one)
    pub fn from_config<C: ProductConfig>(
        config: &C,
        request: &ProjectRequest,
        cwd: &Path,
    ) -> Result<Self> {
        let fetcher = TemplateFetcher::from_config(config, request.variant)?;
        let table = SubstitutionTable::load(cwd)?;
        Ok(Self::new(fetcher, table, ScaffoldOptions::default()))
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Run every stage up to `CheckingModules`
    pub async fn run(&self, ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        let ctx = self.download(ctx).await?;
        let ctx = self.expand(ctx)?;
        let ctx = self.rename(ctx)?;
        let ctx = self.install(ctx).await?;
        let ctx = self.customize(ctx)?;
        self.clean(ctx)
    }

    /// Fetch the template archive; returns once the transfer is complete
    pub async fn download(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::Downloading)?;
        ensure_absent(&ctx.project_root)?;
        ctx.archive = Some(self.fetcher.fetch_archive().await?);
        ctx.stage = Stage::Expanding;
        Ok(ctx)
    }

    /// Expand the downloaded archive into the working directory
    pub fn expand(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::Expanding)?;
        let bytes = ctx
            .archive
            .take()
            .ok_or_else(|| anyhow::anyhow!("No archive downloaded"))?;
        ctx.archive_root = Some(expand_archive(&bytes, &ctx.cwd)?);
        ctx.stage = Stage::Renaming;
        Ok(ctx)
    }

    /// Rename the archive's top-level folder to the project name
    pub fn rename(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::Renaming)?;
        let archive_root = ctx
            .archive_root
            .take()
            .ok_or_else(|| anyhow::anyhow!("No expanded archive to rename"))?;
        // Project named after the archive folder: already in place
        if archive_root == ctx.project_root {
            ctx.stage = Stage::Installing;
            return Ok(ctx);
        }
        ensure_absent(&ctx.project_root)?;
        std::fs::rename(&archive_root, &ctx.project_root).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                archive_root.display(),
                ctx.project_root.display()
            )
        })?;
        ctx.stage = Stage::Installing;
        Ok(ctx)
    }

    /// Install development tools. Failures are reported, never fatal.
    pub async fn install(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::Installing)?;
        let outcome = if !self.options.install || !ctx.project_root.join("package.json").is_file()
        {
            InstallOutcome::Skipped
        } else {
            let manager = self
                .options
                .package_manager
                .unwrap_or_else(PackageManager::detect);
            match manager.install(&ctx.project_root).await {
                Ok(Some(0)) => InstallOutcome::Succeeded,
                Ok(code) => {
                    eprintln!(
                        "{} {} exited with code {}",
                        "Warning:".yellow(),
                        manager.command_line(),
                        code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
                    );
                    InstallOutcome::Failed(code)
                }
                Err(e) => {
                    eprintln!("{} {:#}", "Warning:".yellow(), e);
                    InstallOutcome::Unavailable(format!("{:#}", e))
                }
            }
        };
        ctx.install = Some(outcome);
        ctx.stage = Stage::Customizing;
        Ok(ctx)
    }

    /// Substitute the project's identifiers into the generated files
    pub fn customize(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::Customizing)?;
        ctx.customized = customize(&ctx.project_root, &ctx.request, &self.table)?;
        ctx.stage = Stage::Cleaning;
        Ok(ctx)
    }

    /// Drop readme/changelog files and version-control history
    pub fn clean(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::Cleaning)?;
        clean_provenance(&ctx.project_root, &self.table)?;
        ctx.stage = Stage::CheckingModules;
        Ok(ctx)
    }

    /// Whether the working directory offers module catalogs to merge
    pub fn catalogs_available<C: ProductConfig>(&self, config: &C, ctx: &ScaffoldContext) -> bool {
        modules::catalogs_available(&ctx.cwd, config.modules_dir(), config.plugins_dir())
    }

    /// Merge a module list (and the plugin list of the same name) into the
    /// project, then finish
    pub fn merge_catalogs<C: ProductConfig>(
        &self,
        config: &C,
        mut ctx: ScaffoldContext,
        list_name: &str,
    ) -> Result<(ScaffoldContext, MergeReport, Vec<String>)> {
        ctx.expect_stage(Stage::CheckingModules)?;
        ctx.stage = Stage::MergingModules;

        let report = modules::merge_modules(
            &ctx.project_root,
            &ctx.cwd.join(config.modules_dir()),
            list_name,
            &self.table.registration,
            &self.options.copy,
        )?;
        let plugins = modules::merge_plugins(
            &ctx.project_root,
            &ctx.cwd.join(config.plugins_dir()),
            list_name,
            &self.table.plugins,
        )?;

        ctx.stage = Stage::Done;
        Ok((ctx, report, plugins))
    }

    /// Finish without merging modules
    pub fn finish(&self, mut ctx: ScaffoldContext) -> Result<ScaffoldContext> {
        ctx.expect_stage(Stage::CheckingModules)?;
        ctx.stage = Stage::Done;
        Ok(ctx)
    }
}

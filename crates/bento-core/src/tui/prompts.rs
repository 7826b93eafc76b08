//! Charm-style CLI prompts using cliclack

use crate::error::ScaffoldError;
use crate::modules;
use crate::product::ProductConfig;
use crate::request::{
    default_bundle_id, validate_project_name, ProjectRequest, Variant, DEFAULT_PROJECT_NAME,
};
use crate::runtime;
use crate::scaffold::{InstallOutcome, ScaffoldContext, Scaffolder};
use anyhow::{Context, Result};
use std::path::Path;

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;

    // Inside an existing project the task runner takes over
    if runtime::is_bento_project(&cwd) {
        let code = runtime::run_task_runner(&cwd).await?;
        if code != 0 {
            std::process::exit(code);
        }
        return Ok(());
    }

    cliclack::intro(config.display_name())?;

    let action: &str = cliclack::select("What do you want to do?")
        .item("new", format!("New {} project...", config.display_name()), "")
        .item("docs", "Open documentation", config.docs_url())
        .item("exit", "Exit", "")
        .interact()?;

    match action {
        "new" => new_project(config, &cwd).await,
        "docs" => {
            cliclack::log::info(format!("Opening {}", config.docs_url()))?;
            open::that(config.docs_url())?;
            cliclack::outro("See you soon!")?;
            Ok(())
        }
        _ => {
            cliclack::outro("Bye!")?;
            Ok(())
        }
    }
}

async fn new_project<C: ProductConfig>(config: &C, cwd: &Path) -> Result<()> {
    let request = ask_request()?;

    let ctx = match ScaffoldContext::new(cwd, request) {
        Ok(ctx) => ctx,
        Err(e @ ScaffoldError::Conflict { .. }) => {
            cliclack::log::error(e.to_string())?;
            cliclack::outro_cancel("Nothing was written.")?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let scaffolder = Scaffolder::from_config(config, &ctx.request, cwd)?;

    let spinner = cliclack::spinner();
    spinner.start(format!("Downloading {} project...", config.display_name()));
    let ctx = match scaffolder.download(ctx).await {
        Ok(ctx) => ctx,
        Err(e) => {
            spinner.error("Download failed");
            return Err(e);
        }
    };
    spinner.stop("Downloaded template");

    let spinner = cliclack::spinner();
    spinner.start("Unarchiving...");
    let ctx = scaffolder.expand(ctx).and_then(|ctx| scaffolder.rename(ctx));
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(e) => {
            spinner.error("Unarchiving failed");
            return Err(e);
        }
    };
    spinner.stop(format!("Created {}", ctx.project_root.display()));

    cliclack::log::info("Installing development tools...")?;
    let ctx = scaffolder.install(ctx).await?;
    report_install(ctx.install.as_ref())?;

    let spinner = cliclack::spinner();
    spinner.start("Customizing project...");
    let ctx = scaffolder.customize(ctx).and_then(|ctx| scaffolder.clean(ctx));
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(e) => {
            spinner.error("Customization failed");
            return Err(e);
        }
    };
    spinner.stop(format!("Customized {} file(s)", ctx.customized.len()));

    let ctx = if scaffolder.catalogs_available(config, &ctx)
        && cliclack::confirm("Add modules to the project?")
            .initial_value(false)
            .interact()?
    {
        merge_modules(config, &scaffolder, ctx)?
    } else {
        scaffolder.finish(ctx)?
    };

    print_next_steps(config, &ctx)
}

/// Ask for the project identity; invalid names are asked again
fn ask_request() -> Result<ProjectRequest> {
    let project_name = loop {
        let input: String = cliclack::input("Name your new project (no spaces)")
            .placeholder(DEFAULT_PROJECT_NAME)
            .default_input(DEFAULT_PROJECT_NAME)
            .interact()?;
        match validate_project_name(&input) {
            Ok(()) => break input,
            Err(e) => cliclack::log::warning(e.to_string())?,
        }
    };

    let display_name: String = cliclack::input("Display name")
        .placeholder(&project_name)
        .default_input(&project_name)
        .interact()?;

    let suggested_id = default_bundle_id(&project_name);
    let bundle_id: String = cliclack::input("Bundle identifier")
        .placeholder(&suggested_id)
        .default_input(&suggested_id)
        .interact()?;

    let variant: Variant = cliclack::select("Template")
        .item(Variant::TwoD, Variant::TwoD.display_name(), "")
        .item(Variant::ThreeD, Variant::ThreeD.display_name(), "")
        .interact()?;

    Ok(ProjectRequest::new(project_name, display_name, bundle_id, variant)?)
}

fn report_install(outcome: Option<&InstallOutcome>) -> Result<()> {
    match outcome {
        Some(InstallOutcome::Succeeded) => cliclack::log::success("Development tools installed")?,
        Some(InstallOutcome::Failed(code)) => cliclack::log::warning(format!(
            "Install exited with code {}, continuing",
            code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
        ))?,
        Some(InstallOutcome::Unavailable(reason)) => {
            cliclack::log::warning(format!("Install skipped: {}", reason))?
        }
        Some(InstallOutcome::Skipped) | None => {}
    }
    Ok(())
}

fn merge_modules<C: ProductConfig>(
    config: &C,
    scaffolder: &Scaffolder,
    ctx: ScaffoldContext,
) -> Result<ScaffoldContext> {
    let lists = modules::list_names(&ctx.cwd.join(config.modules_dir()))?;
    if lists.is_empty() {
        cliclack::log::info("No module lists found")?;
        return scaffolder.finish(ctx);
    }

    let mut select = cliclack::select("Select a module list");
    for (idx, name) in lists.iter().enumerate() {
        select = select.item(idx, name, "");
    }
    let selected_idx: usize = select.interact()?;
    let list_name = &lists[selected_idx];

    let (ctx, report, plugins) = scaffolder.merge_catalogs(config, ctx, list_name)?;

    if !report.missing.is_empty() {
        cliclack::log::warning(format!("Missing modules: {}", report.missing.join(", ")))?;
    }
    cliclack::log::success(format!(
        "Copied {} file(s), registered {} module(s)",
        report.copied.len(),
        report.registered.len()
    ))?;
    if !plugins.is_empty() {
        cliclack::log::success(format!("Added plugins: {}", plugins.join(", ")))?;
    }

    Ok(ctx)
}

fn print_next_steps<C: ProductConfig>(config: &C, ctx: &ScaffoldContext) -> Result<()> {
    let steps = config.next_steps(&ctx.project_root, ctx.request.variant);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Installation complete!")?;

    Ok(())
}

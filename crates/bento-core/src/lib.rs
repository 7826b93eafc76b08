//! Bento Core - Shared library for the Bento project scaffolding CLI
//!
//! This library creates a new Bento game project from the empty project
//! archive, customizes it with the operator's identifiers, and optionally
//! merges a catalog of reusable modules into it.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Filesystem utilities, archive fetching and
//!   expansion, template customization, module merging
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `Scaffolder`
//!   stages threaded through a `ScaffoldContext`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use bento_core::{ProjectRequest, ScaffoldContext, Scaffolder, Variant};
//!
//! let request = ProjectRequest::new("cool-game", "Cool Game", "com.example.cool", Variant::TwoD)?;
//! let cwd = std::env::current_dir()?;
//! let scaffolder = Scaffolder::from_config(&MyConfig, &request, &cwd)?;
//! let ctx = scaffolder.run(ScaffoldContext::new(&cwd, request)?).await?;
//! let ctx = scaffolder.finish(ctx)?;
//! ```

pub mod error;
pub mod fs;
pub mod modules;
pub mod product;
pub mod request;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::ScaffoldError;
pub use product::ProductConfig;
pub use request::{ProjectRequest, Variant};
pub use scaffold::{InstallOutcome, ScaffoldContext, ScaffoldOptions, Scaffolder, Stage};
pub use templates::{SubstitutionTable, TemplateFetcher, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;

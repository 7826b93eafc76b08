//! External process management
//!
//! This module provides:
//! - Package manager detection and dependency installation
//! - Existing-project detection and the local task runner

pub mod tool;

pub use tool::{command_exists, is_bento_project, run_task_runner, PackageManager};

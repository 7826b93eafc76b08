//! Module and plugin catalogs merged into a scaffolded project
//!
//! This module provides:
//! - Catalog list files and module descriptors
//! - The ordered initializer registry
//! - The module merge engine and plugin fragment insertion

pub mod catalog;
pub mod merge;
pub mod plugins;
pub mod registry;

use std::path::Path;

pub use catalog::{list_names, read_list, ModuleDescriptor, ASSET_FOLDERS};
pub use merge::{merge_modules, MergeReport};
pub use plugins::merge_plugins;
pub use registry::ModuleRegistry;

/// Module merging is offered only when both catalog folders exist
pub fn catalogs_available(cwd: &Path, modules_dir: &str, plugins_dir: &str) -> bool {
    cwd.join(modules_dir).is_dir() && cwd.join(plugins_dir).is_dir()
}

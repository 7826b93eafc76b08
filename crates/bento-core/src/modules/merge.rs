//! Module merge engine

use super::catalog::{read_list, ModuleDescriptor};
use super::registry::ModuleRegistry;
use crate::fs::{merge_copy_recursive, CopyOptions};
use crate::templates::rules::AnchorPoint;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a module merge
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Files copied into the project
    pub copied: Vec<PathBuf>,
    /// Module names registered, in list order
    pub registered: Vec<String>,
    /// Listed module folders that were not found in the catalog
    pub missing: Vec<String>,
}

/// Merge every module of `catalog_dir/<list_name>.json` into the project.
///
/// Asset folders are merge-copied into the project root. Modules declaring a
/// name and shipping a snippet are registered after the anchor in the
/// registration file, which is read once before the loop and written once
/// after it. A missing list makes the whole call a no-op.
pub fn merge_modules(
    project_root: &Path,
    catalog_dir: &Path,
    list_name: &str,
    registration: &AnchorPoint,
    options: &CopyOptions,
) -> Result<MergeReport> {
    let mut report = MergeReport::default();
    let Some(list) = read_list(catalog_dir, list_name)? else {
        return Ok(report);
    };

    let registration_path = project_root.join(&registration.file);
    let registration_text = if registration_path.is_file() {
        Some(
            fs::read_to_string(&registration_path)
                .with_context(|| format!("Failed to read {}", registration_path.display()))?,
        )
    } else {
        None
    };

    let mut registry = ModuleRegistry::new();
    for folder in &list {
        let module_path = catalog_dir.join(folder);
        if !module_path.is_dir() {
            eprintln!(
                "{} Module '{}' not found in {}",
                "Warning:".yellow(),
                folder,
                catalog_dir.display()
            );
            report.missing.push(folder.clone());
            continue;
        }

        let descriptor = ModuleDescriptor::load(&module_path)?;
        for asset_folder in &descriptor.asset_folders {
            let copied = merge_copy_recursive(&module_path.join(asset_folder), project_root, options)?;
            report.copied.extend(copied);
        }

        if let Some((name, snippet)) = descriptor.registration() {
            registry.register(name, snippet);
        }
    }

    if registry.is_empty() {
        return Ok(report);
    }

    let Some(text) = registration_text else {
        eprintln!(
            "{} {} not found, {} module(s) left unregistered",
            "Warning:".yellow(),
            registration_path.display(),
            registry.len()
        );
        return Ok(report);
    };
    let Some(updated) = registry.inject(&text, &registration.anchor) else {
        eprintln!(
            "{} Anchor '{}' not found in {}, {} module(s) left unregistered",
            "Warning:".yellow(),
            registration.anchor,
            registration_path.display(),
            registry.len()
        );
        return Ok(report);
    };

    fs::write(&registration_path, updated)
        .with_context(|| format!("Failed to write {}", registration_path.display()))?;
    report.registered = registry.names().map(str::to_string).collect();

    Ok(report)
}

//! Project customization: identifier substitution and provenance cleanup

use crate::error::ScaffoldError;
use crate::fs::remove_tree_recursive;
use crate::request::ProjectRequest;
use crate::templates::rules::{render, SubstitutionRule, SubstitutionTable};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Apply the table's rules to every target file that exists under
/// `project_root`. Returns the files that were rewritten; files no rule
/// changed are left untouched on disk.
///
/// Literal rules touch only the first occurrence, and a rule whose text is
/// no longer present is skipped without complaint. Running this twice does
/// not update values the first pass already replaced.
pub fn customize(
    project_root: &Path,
    request: &ProjectRequest,
    table: &SubstitutionTable,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for file in table.target_files() {
        let path = project_root.join(file);
        if !path.is_file() {
            continue;
        }

        let original = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut text = original.clone();
        for rule in table.rules_for(file) {
            text = apply_rule(&path, text, rule, request)?;
        }
        if text == original {
            continue;
        }

        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

fn apply_rule(
    path: &Path,
    text: String,
    rule: &SubstitutionRule,
    request: &ProjectRequest,
) -> Result<String> {
    match rule {
        SubstitutionRule::Literal { find, replace, .. } => {
            if !text.contains(find.as_str()) {
                return Ok(text);
            }
            Ok(text.replacen(find.as_str(), &render(replace, request), 1))
        }
        SubstitutionRule::JsonField { field, value, .. } => {
            let mut doc: serde_json::Value =
                serde_json::from_str(&text).map_err(|source| ScaffoldError::MalformedManifest {
                    path: path.to_path_buf(),
                    source,
                })?;
            let Some(object) = doc.as_object_mut() else {
                anyhow::bail!("{} is not a JSON object", path.display());
            };
            object.insert(field.clone(), serde_json::Value::String(render(value, request)));
            to_json_pretty(&doc).with_context(|| format!("Failed to serialize {}", path.display()))
        }
    }
}

/// JSON with four-space indentation, matching the empty project's style
fn to_json_pretty(value: &serde_json::Value) -> serde_json::Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Remove readme/changelog files and the history folder so the project
/// starts without the template's provenance
pub fn clean_provenance(project_root: &Path, table: &SubstitutionTable) -> Result<()> {
    for name in &table.cleanup {
        let path = project_root.join(name);
        if path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
    }
    remove_tree_recursive(&project_root.join(&table.history_dir))
}

//! Plugin fragments for the native app configuration

use super::catalog::read_list;
use super::registry::insert_after_anchor;
use crate::templates::rules::AnchorPoint;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Fragment file inside each plugin folder
pub const FRAGMENT_FILE: &str = "plugin.xml";

/// Insert the `plugin.xml` fragment of every plugin in
/// `plugins_dir/<list_name>.json` after the anchor comment of the native
/// config, in list order. Returns the plugins that were inserted.
///
/// Missing lists, folders, fragments or config files are skipped.
pub fn merge_plugins(
    project_root: &Path,
    plugins_dir: &Path,
    list_name: &str,
    target: &AnchorPoint,
) -> Result<Vec<String>> {
    let Some(list) = read_list(plugins_dir, list_name)? else {
        return Ok(Vec::new());
    };

    let config_path = project_root.join(&target.file);
    if !config_path.is_file() {
        return Ok(Vec::new());
    }

    let mut block = String::new();
    let mut inserted = Vec::new();
    for plugin in list {
        let fragment_path = plugins_dir.join(&plugin).join(FRAGMENT_FILE);
        if !fragment_path.is_file() {
            continue;
        }
        let fragment = fs::read_to_string(&fragment_path)
            .with_context(|| format!("Failed to read {}", fragment_path.display()))?;
        block.push('\n');
        block.push_str(fragment.trim_end());
        inserted.push(plugin);
    }

    if inserted.is_empty() {
        return Ok(inserted);
    }

    let text = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let Some(updated) = insert_after_anchor(&text, &target.anchor, &block) else {
        eprintln!(
            "{} Anchor '{}' not found in {}, plugins skipped",
            "Warning:".yellow(),
            target.anchor,
            config_path.display()
        );
        return Ok(Vec::new());
    };

    fs::write(&config_path, updated)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ANCHOR: &str = "<!-- bento:plugins -->";

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn target() -> AnchorPoint {
        AnchorPoint {
            file: "config.xml".to_string(),
            anchor: ANCHOR.to_string(),
        }
    }

    #[test]
    fn test_fragments_inserted_in_order() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("game");
        let plugins = dir.path().join("plugins");
        write(&project.join("config.xml"), &format!("<widget>\n{}\n</widget>", ANCHOR));
        write(&plugins.join("splash/plugin.xml"), "<plugin name=\"splash\" />\n");
        write(&plugins.join("ads/plugin.xml"), "<plugin name=\"ads\" />");
        write(&plugins.join("starter.json"), r#"["splash", "missing", "ads"]"#);

        let inserted = merge_plugins(&project, &plugins, "starter", &target()).unwrap();

        assert_eq!(inserted, vec!["splash", "ads"]);
        let config = fs::read_to_string(project.join("config.xml")).unwrap();
        assert_eq!(
            config,
            format!(
                "<widget>\n{}\n<plugin name=\"splash\" />\n<plugin name=\"ads\" />\n</widget>",
                ANCHOR
            )
        );
    }

    #[test]
    fn test_missing_list_is_noop() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("game");
        write(&project.join("config.xml"), ANCHOR);

        let inserted = merge_plugins(&project, &dir.path().join("plugins"), "starter", &target())
            .unwrap();
        assert!(inserted.is_empty());
        assert_eq!(fs::read_to_string(project.join("config.xml")).unwrap(), ANCHOR);
    }

    #[test]
    fn test_missing_anchor_leaves_config() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("game");
        let plugins = dir.path().join("plugins");
        write(&project.join("config.xml"), "<widget />");
        write(&plugins.join("ads/plugin.xml"), "<plugin />");
        write(&plugins.join("starter.json"), r#"["ads"]"#);

        let inserted = merge_plugins(&project, &plugins, "starter", &target()).unwrap();
        assert!(inserted.is_empty());
        assert_eq!(fs::read_to_string(project.join("config.xml")).unwrap(), "<widget />");
    }
}

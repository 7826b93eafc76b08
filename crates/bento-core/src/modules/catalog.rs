//! Module catalog: list files and per-module descriptors

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Sub-folders of a module that get merged into the project root, in order
pub const ASSET_FOLDERS: [&str; 5] = ["code", "assets", "scripts", "libraries", "misc"];

/// Module metadata file, declares the registration name
pub const METADATA_FILE: &str = "init.json";

/// Initialization snippet registered under the module's name
pub const SNIPPET_FILE: &str = "init.js";

/// Read `catalog_dir/<list_name>.json`. A missing list is `Ok(None)`.
pub fn read_list(catalog_dir: &Path, list_name: &str) -> Result<Option<Vec<String>>> {
    let path = catalog_dir.join(format!("{}.json", list_name));
    if !path.is_file() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let list = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse module list {}", path.display()))?;
    Ok(Some(list))
}

/// Names of every list file in a catalog folder, sorted
pub fn list_names(catalog_dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = fs::read_dir(catalog_dir)
        .with_context(|| format!("Failed to read {}", catalog_dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[derive(Debug, Deserialize)]
struct ModuleMetadata {
    /// Only a string name registers the module
    #[serde(default)]
    name: Option<serde_json::Value>,
}

/// What one module folder offers to a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Folder the module was read from
    pub path: PathBuf,
    /// Registration key declared in `init.json`
    pub name: Option<String>,
    /// Asset sub-folders present in the module, in conventional order
    pub asset_folders: Vec<&'static str>,
    /// Contents of `init.js`, trailing whitespace trimmed
    pub init_snippet: Option<String>,
}

impl ModuleDescriptor {
    /// Read a module folder. Absent metadata or snippet files are fine;
    /// metadata that is present but unparseable is not.
    pub fn load(path: &Path) -> Result<Self> {
        let asset_folders = ASSET_FOLDERS
            .into_iter()
            .filter(|folder| path.join(folder).is_dir())
            .collect();

        let metadata_path = path.join(METADATA_FILE);
        let name = if metadata_path.is_file() {
            let content = fs::read_to_string(&metadata_path)
                .with_context(|| format!("Failed to read {}", metadata_path.display()))?;
            let metadata: ModuleMetadata = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", metadata_path.display()))?;
            metadata
                .name
                .and_then(|name| name.as_str().map(str::to_string))
        } else {
            None
        };

        let snippet_path = path.join(SNIPPET_FILE);
        let init_snippet = if snippet_path.is_file() {
            let content = fs::read_to_string(&snippet_path)
                .with_context(|| format!("Failed to read {}", snippet_path.display()))?;
            Some(content.trim_end().to_string())
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            name,
            asset_folders,
            init_snippet,
        })
    }

    /// `(name, snippet)` when the module can be registered
    pub fn registration(&self) -> Option<(&str, &str)> {
        match (&self.name, &self.init_snippet) {
            (Some(name), Some(snippet)) => Some((name.as_str(), snippet.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_list_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(read_list(dir.path(), "starter").unwrap(), None);
    }

    #[test]
    fn test_read_list_keeps_order() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("starter.json"), r#"["beta", "alpha"]"#);
        assert_eq!(
            read_list(dir.path(), "starter").unwrap(),
            Some(vec!["beta".to_string(), "alpha".to_string()])
        );
    }

    #[test]
    fn test_list_names_only_json() {
        let dir = tempdir().unwrap();
        write(&dir.path().join("starter.json"), "[]");
        write(&dir.path().join("ads.json"), "[]");
        write(&dir.path().join("notes.txt"), "");
        fs::create_dir_all(dir.path().join("alpha")).unwrap();
        assert_eq!(list_names(dir.path()).unwrap(), vec!["ads", "starter"]);
    }

    #[test]
    fn test_descriptor_full_module() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("alpha");
        write(&module.join("assets/a.png"), "png");
        write(&module.join("code/a.js"), "a");
        write(&module.join(METADATA_FILE), r#"{"name": "alpha", "version": 2}"#);
        write(&module.join(SNIPPET_FILE), "{}\n");

        let descriptor = ModuleDescriptor::load(&module).unwrap();
        assert_eq!(descriptor.asset_folders, vec!["code", "assets"]);
        assert_eq!(descriptor.registration(), Some(("alpha", "{}")));
    }

    #[test]
    fn test_descriptor_without_name_not_registered() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("gamma");
        write(&module.join(METADATA_FILE), r#"{"author": "someone"}"#);
        write(&module.join(SNIPPET_FILE), "{}");

        let descriptor = ModuleDescriptor::load(&module).unwrap();
        assert_eq!(descriptor.name, None);
        assert_eq!(descriptor.registration(), None);
    }

    #[test]
    fn test_descriptor_non_string_name_not_registered() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("numbered");
        write(&module.join("code/a.js"), "a");
        write(&module.join(METADATA_FILE), r#"{"name": 3}"#);
        write(&module.join(SNIPPET_FILE), "{}");

        let descriptor = ModuleDescriptor::load(&module).unwrap();
        assert_eq!(descriptor.name, None);
        assert_eq!(descriptor.registration(), None);
        assert_eq!(descriptor.asset_folders, vec!["code"]);
    }

    #[test]
    fn test_descriptor_without_snippet_not_registered() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("delta");
        write(&module.join(METADATA_FILE), r#"{"name": "delta"}"#);

        let descriptor = ModuleDescriptor::load(&module).unwrap();
        assert_eq!(descriptor.registration(), None);
    }

    #[test]
    fn test_descriptor_bad_metadata_errors() {
        let dir = tempdir().unwrap();
        let module = dir.path().join("broken");
        write(&module.join(METADATA_FILE), "{ nope");
        assert!(ModuleDescriptor::load(&module).is_err());
    }
}

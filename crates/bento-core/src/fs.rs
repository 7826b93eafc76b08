//! Filesystem utilities shared by the customizer and the module merge
//!
//! Both operations are synchronous: each scaffold stage finishes all of its
//! file I/O before the next one starts.

use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Options for [`merge_copy_recursive`]
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// File or folder names skipped wherever they appear in the source tree
    exclude: HashSet<OsString>,
    /// Suppress the per-file copy log
    quiet: bool,
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude(mut self, name: impl AsRef<OsStr>) -> Self {
        self.exclude.insert(name.as_ref().to_os_string());
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn is_excluded(&self, name: &OsStr) -> bool {
        self.exclude.contains(name)
    }
}

/// Delete `path` and everything beneath it. Missing paths are not an error.
pub fn remove_tree_recursive(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("Failed to stat {}", path.display())),
    };

    if !meta.is_dir() {
        return fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()));
    }

    // contents_first gives post-order: files go before their folder
    for entry in WalkDir::new(path).contents_first(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        let entry_path = entry.path();
        if entry.file_type().is_dir() {
            fs::remove_dir(entry_path)
                .with_context(|| format!("Failed to remove directory {}", entry_path.display()))?;
        } else {
            fs::remove_file(entry_path)
                .with_context(|| format!("Failed to remove {}", entry_path.display()))?;
        }
    }

    Ok(())
}

/// Copy `source_dir` into `dest_dir/<source folder name>`, merging with
/// whatever is already there.
///
/// The destination folder is created when absent and reused when present.
/// Files that already exist are overwritten; nothing at the destination is
/// ever deleted. Returns the destination path of every copied file.
pub fn merge_copy_recursive(
    source_dir: &Path,
    dest_dir: &Path,
    options: &CopyOptions,
) -> Result<Vec<PathBuf>> {
    let folder_name = source_dir
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Cannot copy {}: no folder name", source_dir.display()))?;
    let target_root = dest_dir.join(folder_name);

    fs::create_dir_all(&target_root)
        .with_context(|| format!("Failed to create directory: {}", target_root.display()))?;

    let mut copied = Vec::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !options.is_excluded(e.file_name()));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", source_dir.display()))?;
        let relative = entry.path().strip_prefix(source_dir)?;
        let target = target_root.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::copy(entry.path(), &target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                entry.path().display(),
                target.display()
            )
        })?;

        if !options.quiet {
            println!("  {} {}", "->".blue(), target.display());
        }
        copied.push(target);
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn file_set(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_remove_tree_deletes_nested_contents() {
        let dir = tempdir().unwrap();
        let git = dir.path().join(".git");
        write(&git.join("objects/ab/cdef"), "blob");
        write(&git.join("HEAD"), "ref: refs/heads/master");

        remove_tree_recursive(&git).unwrap();
        assert!(!git.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_remove_tree_twice_is_noop() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("gone");
        write(&target.join("a.txt"), "a");

        remove_tree_recursive(&target).unwrap();
        remove_tree_recursive(&target).unwrap();
        assert!(!target.exists());
    }

    #[test]
    fn test_remove_tree_handles_plain_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("readme.md");
        write(&file, "hi");

        remove_tree_recursive(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_merge_copy_creates_named_folder() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("module/assets");
        write(&src.join("images/hero.png"), "png");
        let dst = dir.path().join("project");
        fs::create_dir_all(&dst).unwrap();

        let copied = merge_copy_recursive(&src, &dst, &CopyOptions::new().quiet(true)).unwrap();

        assert_eq!(copied, vec![dst.join("assets/images/hero.png")]);
        assert_eq!(
            fs::read_to_string(dst.join("assets/images/hero.png")).unwrap(),
            "png"
        );
    }

    #[test]
    fn test_merge_copy_keeps_existing_files_and_overwrites_collisions() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("module/js");
        write(&src.join("shared.js"), "new");
        let dst = dir.path().join("project");
        write(&dst.join("js/shared.js"), "old");
        write(&dst.join("js/game.js"), "game");

        merge_copy_recursive(&src, &dst, &CopyOptions::new().quiet(true)).unwrap();

        assert_eq!(fs::read_to_string(dst.join("js/shared.js")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dst.join("js/game.js")).unwrap(), "game");
    }

    #[test]
    fn test_merge_copy_twice_leaves_same_file_set() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("module/code");
        write(&src.join("a.js"), "a");
        write(&src.join("nested/b.js"), "b");
        let dst = dir.path().join("project");
        fs::create_dir_all(&dst).unwrap();
        let options = CopyOptions::new().quiet(true);

        merge_copy_recursive(&src, &dst, &options).unwrap();
        let first = file_set(&dst);
        merge_copy_recursive(&src, &dst, &options).unwrap();
        let second = file_set(&dst);

        assert_eq!(first, second);
        assert_eq!(first, file_set(dir.path().join("module").as_path()));
    }

    #[test]
    fn test_merge_copy_honors_exclusions() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("module/misc");
        write(&src.join("keep.txt"), "keep");
        write(&src.join(".DS_Store"), "junk");
        write(&src.join("node_modules/pkg/index.js"), "junk");
        let dst = dir.path().join("project");
        fs::create_dir_all(&dst).unwrap();

        let options = CopyOptions::new()
            .exclude(".DS_Store")
            .exclude("node_modules")
            .quiet(true);
        let copied = merge_copy_recursive(&src, &dst, &options).unwrap();

        assert_eq!(copied, vec![dst.join("misc/keep.txt")]);
        assert!(!dst.join("misc/node_modules").exists());
    }
}

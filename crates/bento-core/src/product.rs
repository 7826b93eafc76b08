//! Product configuration trait for the CLI binary
//!
//! The binary implements this trait to pin down where template archives come
//! from and where module catalogs live, keeping the library free of URLs.

use crate::request::Variant;
use std::path::Path;

/// Configuration for a scaffolding product
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Archive URL for a template variant. `{branch}` is replaced with the
    /// variant's branch.
    fn default_archive_url(&self) -> &'static str;

    /// Environment variable name for overriding the archive URL
    fn archive_url_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// Folder holding module list files and module folders
    fn modules_dir(&self) -> &'static str {
        "modules"
    }

    /// Folder holding plugin list files and plugin folders
    fn plugins_dir(&self) -> &'static str {
        "plugins"
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, variant: Variant) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }

    /// Resolve the archive URL for a variant, honoring the env override
    fn archive_url(&self, variant: Variant) -> String {
        let template = std::env::var(self.archive_url_env())
            .unwrap_or_else(|_| self.default_archive_url().to_string());
        template.replace("{branch}", variant.branch())
    }
}

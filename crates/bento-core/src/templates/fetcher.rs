//! Template archive acquisition and expansion
//!
//! Remote archives are downloaded whole into memory; a local `.zip` path can
//! stand in for the remote during development. Expansion writes the archive's
//! single top-level folder into a destination directory.

use crate::error::ScaffoldError;
use crate::product::ProductConfig;
use crate::request::Variant;
use anyhow::{Context, Result};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use url::Url;
use zip::ZipArchive;

/// Template source - either remote URL or local zip file
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Remote(Url),
    Local(PathBuf),
}

impl TemplateSource {
    /// Create a template source for a variant from a product config.
    /// URLs without a scheme are treated as local archive paths.
    pub fn from_config<C: ProductConfig>(config: &C, variant: Variant) -> Result<Self> {
        let url_str = config.archive_url(variant);
        match Url::parse(&url_str) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|_| anyhow::anyhow!("Invalid archive path: {}", url_str)),
            Ok(_) => anyhow::bail!("Unsupported archive URL: {}", url_str),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::Local(url_str.into())),
            Err(e) => Err(e).with_context(|| format!("Invalid archive URL: {}", url_str)),
        }
    }

    /// Create a local template source from a zip path
    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }
}

/// Template fetcher - retrieves archive bytes from remote or local sources
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a fetcher for a variant from a product config
    pub fn from_config<C: ProductConfig>(config: &C, variant: Variant) -> Result<Self> {
        let source = TemplateSource::from_config(config, variant)?;
        Ok(Self::new(source, config.user_agent()))
    }

    /// Fetch the whole archive. Resolves once the transfer has completed.
    pub async fn fetch_archive(&self) -> Result<Vec<u8>> {
        match &self.source {
            TemplateSource::Remote(url) => {
                let response = self
                    .client
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch template archive from {}", url))?;

                if !response.status().is_success() {
                    return Err(ScaffoldError::Download {
                        url: url.to_string(),
                        status: response.status().as_u16(),
                    }
                    .into());
                }

                Ok(response
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to read template archive from {}", url))?
                    .to_vec())
            }
            TemplateSource::Local(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Get the template source
    pub fn source(&self) -> &TemplateSource {
        &self.source
    }
}

/// Name of the single top-level folder every entry in the archive lives under
pub fn archive_root(zip_bytes: &[u8]) -> Result<String> {
    let mut archive = open_archive(zip_bytes)?;
    let mut root: Option<String> = None;

    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        let Some(path) = file.enclosed_name() else {
            return Err(ScaffoldError::Archive(format!("unsafe entry path '{}'", file.name())).into());
        };
        let first = match path.components().next() {
            Some(Component::Normal(first)) => first.to_string_lossy().into_owned(),
            _ => continue,
        };
        // A lone file at the top level means there is no folder to rename
        if path.components().count() == 1 && !file.is_dir() {
            return Err(ScaffoldError::Archive(format!(
                "expected a single top-level folder, found file '{}'",
                first
            ))
            .into());
        }
        if let Some(existing) = root.as_deref() {
            if existing != first {
                return Err(ScaffoldError::Archive(format!(
                    "expected a single top-level folder, found '{}' and '{}'",
                    existing, first
                ))
                .into());
            }
            continue;
        }
        root = Some(first);
    }

    root.ok_or_else(|| ScaffoldError::EmptyArchive.into())
}

/// Expand the archive into `dest_dir`, returning the path of its top-level
/// folder. Refuses to merge into a folder that is already there.
pub fn expand_archive(zip_bytes: &[u8], dest_dir: &Path) -> Result<PathBuf> {
    let root = archive_root(zip_bytes)?;
    let root_path = dest_dir.join(&root);
    if root_path.exists() {
        return Err(ScaffoldError::Conflict { path: root_path }.into());
    }

    let mut archive = open_archive(zip_bytes)?;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(relative) = file.enclosed_name() else {
            continue;
        };
        let target = dest_dir.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        fs::write(&target, &contents)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;

        apply_mode(&target, file.unix_mode())?;
    }

    Ok(root_path)
}

#[cfg(unix)]
fn apply_mode(target: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode.map(|m| m & 0o777).filter(|m| *m != 0) {
        fs::set_permissions(target, fs::Permissions::from_mode(mode))
            .with_context(|| format!("Failed to set permissions: {}", target.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_target: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}

fn open_archive(zip_bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(zip_bytes))
        .map_err(|e| ScaffoldError::Archive(e.to_string()).into())
}

//! Error taxonomy for scaffolding operations
//!
//! Only the failures callers need to tell apart get a variant here. Everything
//! else travels as `anyhow::Error` with context attached.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the scaffold pipeline
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Project name was empty or contained whitespace
    #[error("invalid project name '{0}': names cannot be empty or contain spaces")]
    InvalidProjectName(String),

    /// Target folder already exists, nothing was written
    #[error("the folder {} already exists", .path.display())]
    Conflict { path: PathBuf },

    /// The package manifest could not be parsed as JSON
    #[error("malformed manifest {}: {source}", .path.display())]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Template archive request returned a non-success status
    #[error("failed to download template archive from {url}: HTTP {status}")]
    Download { url: String, status: u16 },

    /// Template archive could not be read or expanded
    #[error("invalid template archive: {0}")]
    Archive(String),

    /// Template archive has no top-level folder to rename
    #[error("template archive is empty")]
    EmptyArchive,
}

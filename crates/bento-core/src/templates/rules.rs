//! Substitution rule table
//!
//! The table pins every placeholder the customizer knows about to the file it
//! lives in, so a change in the empty project's text is a table edit.

use crate::request::ProjectRequest;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest table format version this build understands
pub const SUPPORTED_VERSION: u32 = 1;

/// File name of a table that replaces the built-in one
pub const OVERRIDE_FILE: &str = "bento.substitutions.yaml";

const BUILTIN_TABLE: &str = include_str!("substitutions.yaml");

/// A single edit applied to one generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubstitutionRule {
    /// Replace the first occurrence of `find` with `replace`
    Literal {
        file: String,
        find: String,
        replace: String,
    },

    /// Set a top-level string field of a JSON document
    JsonField {
        file: String,
        field: String,
        value: String,
    },
}

impl SubstitutionRule {
    /// Path of the target file, relative to the project root
    pub fn file(&self) -> &str {
        match self {
            SubstitutionRule::Literal { file, .. } | SubstitutionRule::JsonField { file, .. } => {
                file
            }
        }
    }
}

/// A file plus the literal marker text that snippets get inserted after
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub file: String,
    pub anchor: String,
}

/// The full, versioned substitution table (`substitutions.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionTable {
    /// Table format version
    pub version: u32,

    /// Rules in application order
    pub rules: Vec<SubstitutionRule>,

    /// Top-level files removed once customization is done
    #[serde(default)]
    pub cleanup: Vec<String>,

    /// Version-control history folder deleted after customization
    #[serde(default = "default_history_dir")]
    pub history_dir: String,

    /// Where module initializers are registered
    pub registration: AnchorPoint,

    /// Where plugin fragments are inserted
    pub plugins: AnchorPoint,
}

fn default_history_dir() -> String {
    ".git".to_string()
}

impl SubstitutionTable {
    /// Parse a table from YAML text, rejecting newer format versions
    pub fn parse(content: &str) -> Result<Self> {
        let table: Self =
            serde_yaml::from_str(content).context("Failed to parse substitution table")?;
        if table.version > SUPPORTED_VERSION {
            anyhow::bail!(
                "Substitution table version {} is newer than supported version {}",
                table.version,
                SUPPORTED_VERSION
            );
        }
        Ok(table)
    }

    /// The table shipped with this build
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_TABLE)
    }

    /// Use `dir/bento.substitutions.yaml` when present, else the built-in table
    pub fn load(dir: &Path) -> Result<Self> {
        let override_path = dir.join(OVERRIDE_FILE);
        if !override_path.is_file() {
            return Self::builtin();
        }
        let content = std::fs::read_to_string(&override_path)
            .with_context(|| format!("Failed to read {}", override_path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid {}", override_path.display()))
    }

    /// Distinct target files in first-use order
    pub fn target_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !files.contains(&rule.file()) {
                files.push(rule.file());
            }
        }
        files
    }

    /// Rules that edit `file`, in table order
    pub fn rules_for<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a SubstitutionRule> {
        self.rules.iter().filter(move |rule| rule.file() == file)
    }
}

/// Fill `{project_name}`, `{display_name}` and `{bundle_id}` tokens.
///
/// Single left-to-right pass: substituted values are never scanned again,
/// so a value that itself looks like a token is written verbatim.
pub fn render(template: &str, request: &ProjectRequest) -> String {
    let tokens = [
        ("{project_name}", request.project_name.as_str()),
        ("{display_name}", request.display_name.as_str()),
        ("{bundle_id}", request.bundle_id.as_str()),
    ];

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tokens.iter().find(|(token, _)| tail.starts_with(token)) {
            Some((token, value)) => {
                out.push_str(value);
                rest = &tail[token.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

//! Project identity captured from the operator before scaffolding

use crate::error::ScaffoldError;
use std::fmt;

/// Name used when the operator leaves the project name blank
pub const DEFAULT_PROJECT_NAME: &str = "EmptyBentoProject";

/// Template flavor, selected through the archive branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    TwoD,
    ThreeD,
}

impl Variant {
    pub fn display_name(&self) -> &'static str {
        match self {
            Variant::TwoD => "2D",
            Variant::ThreeD => "3D",
        }
    }

    /// Branch of the empty project repository holding this flavor
    pub fn branch(&self) -> &'static str {
        match self {
            Variant::TwoD => "master",
            Variant::ThreeD => "3d",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Identifiers substituted into the generated project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    pub project_name: String,
    pub display_name: String,
    pub bundle_id: String,
    pub variant: Variant,
}

impl ProjectRequest {
    /// Build a request, rejecting project names the folder layout can't use
    pub fn new(
        project_name: impl Into<String>,
        display_name: impl Into<String>,
        bundle_id: impl Into<String>,
        variant: Variant,
    ) -> Result<Self, ScaffoldError> {
        let project_name = project_name.into();
        validate_project_name(&project_name)?;
        Ok(Self {
            project_name,
            display_name: display_name.into(),
            bundle_id: bundle_id.into(),
            variant,
        })
    }
}

/// Project names become folder names and storage ids, so no whitespace
pub fn validate_project_name(name: &str) -> Result<(), ScaffoldError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(ScaffoldError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

/// Bundle id suggested for a project name, e.g. `com.bento.coolgame`
pub fn default_bundle_id(project_name: &str) -> String {
    let slug: String = project_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("com.bento.{}", slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_names_with_spaces() {
        assert!(validate_project_name("my game").is_err());
        assert!(validate_project_name("tab\tname").is_err());
        assert!(validate_project_name("").is_err());
    }

    #[test]
    fn test_accepts_identifiers() {
        assert!(validate_project_name("cool-game").is_ok());
        assert!(validate_project_name(DEFAULT_PROJECT_NAME).is_ok());
    }

    #[test]
    fn test_request_keeps_display_name_verbatim() {
        let req = ProjectRequest::new("cool-game", "My Game", "com.example.cool", Variant::TwoD)
            .unwrap();
        assert_eq!(req.display_name, "My Game");
        assert!(ProjectRequest::new("my game", "x", "y", Variant::TwoD).is_err());
    }

    #[test]
    fn test_variant_branches() {
        assert_eq!(Variant::TwoD.branch(), "master");
        assert_eq!(Variant::ThreeD.branch(), "3d");
        assert_eq!(Variant::default(), Variant::TwoD);
    }

    #[test]
    fn test_default_bundle_id() {
        assert_eq!(default_bundle_id("Cool-Game_2"), "com.bento.coolgame2");
    }
}

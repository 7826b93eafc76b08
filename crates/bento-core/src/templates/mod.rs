//! Template acquisition and customization
//!
//! This module provides:
//! - Archive fetching from remote URLs or local zip files
//! - Archive expansion into the working directory
//! - The versioned substitution rule table
//! - Identifier substitution and provenance cleanup

pub mod customizer;
pub mod fetcher;
pub mod rules;

pub use customizer::{clean_provenance, customize};
pub use fetcher::{archive_root, expand_archive, TemplateFetcher, TemplateSource};
pub use rules::{AnchorPoint, SubstitutionRule, SubstitutionTable};

//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod document;
mod output;
mod reconcile;
mod sections;
mod sources;

pub use document::FileDocumentConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use reconcile::FileReconcileConfig;
pub use sections::FileSectionConfig;
pub use sources::FileSourceConfig;

use docsync_application::SourceSpec;
use docsync_domain::SectionMapping;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("section title cannot be empty")]
    EmptySectionTitle,

    #[error("section '{0}' has no prefixes")]
    SectionWithoutPrefixes(String),

    #[error("source path cannot be empty")]
    EmptySourcePath,

    #[error("document path cannot be empty")]
    EmptyDocumentPath,

    #[error("reconcile.doc_only_marker cannot be empty")]
    EmptyDocOnlyMarker,

    #[error("duplicate source id '{0}'")]
    DuplicateSourceId(String),

    #[error("source {path}: unknown environment '{value}' (expected local, prod, test or template)")]
    InvalidEnvironment { path: String, value: String },

    #[error("source {path}: unknown format '{value}' (expected properties or env-template)")]
    InvalidFormat { path: String, value: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Documentation file settings
    pub document: FileDocumentConfig,
    /// Configuration sources, in discovery order
    pub sources: Vec<FileSourceConfig>,
    /// Section-to-prefix mapping, in priority order for new sections
    pub sections: Vec<FileSectionConfig>,
    /// Reconciliation policy
    pub reconcile: FileReconcileConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.document.path.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyDocumentPath);
        }

        let mut ids = HashSet::new();
        for source in &self.sources {
            if let Err(e) = source.to_spec() {
                issues.push(e);
            }
            if !source.path.trim().is_empty() && !ids.insert(source.id()) {
                issues.push(ConfigValidationError::DuplicateSourceId(source.id().to_string()));
            }
        }

        for section in &self.sections {
            if section.title.trim().is_empty() {
                issues.push(ConfigValidationError::EmptySectionTitle);
            } else if section.prefixes.iter().all(|p| p.trim().is_empty()) {
                issues.push(ConfigValidationError::SectionWithoutPrefixes(
                    section.title.clone(),
                ));
            }
        }

        if self.reconcile.doc_only_marker.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyDocOnlyMarker);
        }

        issues
    }

    /// Source specs in configuration order.
    pub fn source_specs(&self) -> Result<Vec<SourceSpec>, ConfigValidationError> {
        self.sources.iter().map(FileSourceConfig::to_spec).collect()
    }

    pub fn section_mapping(&self) -> SectionMapping {
        SectionMapping::new(self.sections.iter().map(FileSectionConfig::to_rule).collect())
    }
}

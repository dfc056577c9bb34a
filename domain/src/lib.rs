//! Domain layer for docsync
//!
//! This crate contains the reconciliation engine that keeps a Markdown
//! configuration reference in line with the configuration sources it
//! describes. It performs no I/O; sources and documents arrive as text.
//!
//! # Pipeline
//!
//! 1. **Source Loader** ([`source`]): properties files and env templates are
//!    parsed and merged by name into [`ConfigKey`]s
//! 2. **Key Classifier** ([`classify`]): requirement status, environment
//!    variance and the redacting example policy
//! 3. **Doc Model Parser** ([`document`]): the existing document as ordered
//!    sections, prose kept verbatim
//! 4. **Reconciler** ([`reconcile`]): the [`ChangeSet`] between the two
//! 5. **Renderer** ([`render`]): the updated document text
//!
//! Parsing the document is independent of loading sources; the reconciler
//! is the first stage that needs both.

pub mod classify;
pub mod config;
pub mod core;
pub mod document;
pub mod reconcile;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use classify::{
    ClassifiedKey, REDACTED_PLACEHOLDER, RequirementStatus, VARIES_PLACEHOLDER, classify,
    environments_in_use, secret_exposures,
};
pub use config::{
    OutputFormat, SectionAssignment, SectionMapping, SectionRule, SyncOptions,
    UNCATEGORIZED_SECTION,
};
pub use core::error::{
    AmbiguousMappingError, DomainError, MalformedSourceError, SecretExposureWarning,
    UnrecognizedTableError, UnterminatedViewError,
};
pub use document::{Document, DocumentSection, DocumentedEntry, parse_document};
pub use reconcile::{ChangeSet, ChangeSummary, SectionChanges, reconcile};
pub use render::render;
pub use source::{
    ConfigKey, ConfigSource, Environment, SourceFormat, SourceTag, ValueType, load_keys,
};

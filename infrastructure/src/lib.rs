//! Infrastructure layer for docsync
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod files;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileDocumentConfig, FileOutputConfig,
    FileOutputFormat, FileReconcileConfig, FileSectionConfig, FileSourceConfig,
};
pub use files::{LocalDocumentStore, LocalSourceReader};

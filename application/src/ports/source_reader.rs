//! Source reader port
//!
//! Defines how configuration source files are fetched as text.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading a configuration source
#[derive(Error, Debug)]
pub enum SourceReadError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("Failed to read source {path}: {message}")]
    Io { path: String, message: String },
}

/// Reader for configuration sources
///
/// Implementations live in the infrastructure layer. The engine itself never
/// touches the filesystem.
#[async_trait]
pub trait SourceReaderPort: Send + Sync {
    /// Read the full text of one source
    async fn read_source(&self, path: &Path) -> Result<String, SourceReadError>;
}

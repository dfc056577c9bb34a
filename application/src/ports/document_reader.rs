//! Document reader port
//!
//! Defines how the existing documentation file is fetched.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading the documentation file
#[derive(Error, Debug)]
pub enum DocumentReadError {
    #[error("Failed to read document {path}: {message}")]
    Io { path: String, message: String },

    #[error("Document {0} is not valid UTF-8")]
    InvalidEncoding(String),
}

/// Reader for the documentation file
#[async_trait]
pub trait DocumentReaderPort: Send + Sync {
    /// Read the document text, or `None` when it does not exist yet
    async fn read_document(&self, path: &Path) -> Result<Option<String>, DocumentReadError>;
}

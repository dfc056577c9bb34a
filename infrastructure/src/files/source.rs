//! Source files read from the local file system.

use super::resolve;
use async_trait::async_trait;
use docsync_application::{SourceReadError, SourceReaderPort};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads configuration sources with `tokio::fs`.
///
/// Relative paths resolve against the root directory when one is set,
/// otherwise against the working directory.
#[derive(Debug, Clone, Default)]
pub struct LocalSourceReader {
    root: Option<PathBuf>,
}

impl LocalSourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

#[async_trait]
impl SourceReaderPort for LocalSourceReader {
    async fn read_source(&self, path: &Path) -> Result<String, SourceReadError> {
        let full = resolve(self.root.as_deref(), path);
        debug!(path = %full.display(), "reading_source");

        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SourceReadError::NotFound(full.display().to_string()),
                _ => SourceReadError::Io {
                    path: full.display().to_string(),
                    message: e.to_string(),
                },
            })
    }
}

//! The documentation file on the local file system.

use super::resolve;
use async_trait::async_trait;
use docsync_application::{DocumentReadError, DocumentReaderPort};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Reads and writes the documentation file.
///
/// Reading is the [`DocumentReaderPort`] used by the sync use case; writing
/// is only invoked by the binary after the user asked for it.
#[derive(Debug, Clone, Default)]
pub struct LocalDocumentStore {
    root: Option<PathBuf>,
}

impl LocalDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    /// Write the document, creating parent directories as needed.
    ///
    /// The text goes to a sibling temporary file first and is renamed over
    /// the target, so readers never observe a half-written document.
    pub async fn write_document(&self, path: &Path, text: &str) -> io::Result<()> {
        let full = resolve(self.root.as_deref(), path);
        if let Some(parent) = full.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut temp = full.clone().into_os_string();
        temp.push(".docsync.tmp");
        tokio::fs::write(&temp, text).await?;
        tokio::fs::rename(&temp, &full).await?;

        info!("Wrote {}", full.display());
        Ok(())
    }
}

#[async_trait]
impl DocumentReaderPort for LocalDocumentStore {
    async fn read_document(&self, path: &Path) -> Result<Option<String>, DocumentReadError> {
        let full = resolve(self.root.as_deref(), path);
        debug!(path = %full.display(), "reading_document");

        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(
                DocumentReadError::InvalidEncoding(full.display().to_string()),
            ),
            Err(e) => Err(DocumentReadError::Io {
                path: full.display().to_string(),
                message: e.to_string(),
            }),
        }
    }
}

//! Documentation file configuration from TOML (`[document]` section)

use serde::{Deserialize, Serialize};

/// Raw document configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDocumentConfig {
    /// Path of the Markdown configuration reference
    pub path: String,
}

impl Default for FileDocumentConfig {
    fn default() -> Self {
        Self {
            path: "docs/CONFIGURATION.md".to_string(),
        }
    }
}

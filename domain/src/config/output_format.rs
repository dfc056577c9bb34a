//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for the reconciliation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored summary (default)
    #[default]
    Text,
    /// Machine-readable JSON summary
    Json,
}

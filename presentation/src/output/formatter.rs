//! Output formatter trait

use docsync_application::SyncDocsOutput;
use std::path::Path;

/// Trait for formatting sync results
pub trait OutputFormatter {
    /// Format the human-readable report
    fn format(&self, output: &SyncDocsOutput, document: &Path) -> String;

    /// Format as JSON
    fn format_json(&self, output: &SyncDocsOutput, document: &Path) -> String;

    /// Format the document changes as a unified diff
    fn format_diff(&self, output: &SyncDocsOutput, document: &Path) -> String;
}

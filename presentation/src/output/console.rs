//! Console output formatter for sync results

use crate::output::diff;
use crate::output::formatter::OutputFormatter;
use chrono::Utc;
use colored::Colorize;
use docsync_application::SyncDocsOutput;
use docsync_domain::core::string::truncate;
use docsync_domain::reconcile::{EntryAddition, EntryRemoval, EntryUpdate};
use docsync_domain::{
    AmbiguousMappingError, ChangeSummary, Environment, SecretExposureWarning, SectionChanges,
    UnrecognizedTableError, UnterminatedViewError,
};
use serde::Serialize;
use std::path::Path;

const MAX_CELL_WIDTH: usize = 48;

/// Formats sync results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the per-section report
    pub fn format(output: &SyncDocsOutput, document: &Path) -> String {
        let changes = &output.change_set;
        let mut out = String::new();

        out.push_str(&Self::header("Documentation Sync"));
        out.push('\n');

        let state = if output.document_existed {
            String::new()
        } else {
            format!(" {}", "(new file)".yellow())
        };
        out.push_str(&format!(
            "{} {}{}\n",
            "Document:".cyan().bold(),
            document.display(),
            state
        ));
        out.push_str(&format!("{} {}\n", "Keys:".cyan().bold(), output.keys.len()));
        if !changes.environments.is_empty() {
            out.push_str(&format!(
                "{} {}\n",
                "Environments:".cyan().bold(),
                Self::join_environments(&changes.environments)
            ));
        }

        for section in &changes.sections {
            out.push_str(&Self::format_section(section));
        }

        if !changes.unmapped.is_empty()
            || !changes.unrecognized_tables.is_empty()
            || !changes.unterminated_views.is_empty()
            || !changes.intentionally_undocumented.is_empty()
        {
            out.push_str(&Self::section_header("Needs review"));
            for unmapped in &changes.unmapped {
                out.push_str(&format!("  {} {}\n", "?".yellow().bold(), unmapped));
            }
            for table in &changes.unrecognized_tables {
                out.push_str(&format!("  {} {}\n", "?".yellow().bold(), table));
            }
            for view in &changes.unterminated_views {
                out.push_str(&format!("  {} {}\n", "?".yellow().bold(), view));
            }
            for name in &changes.intentionally_undocumented {
                out.push_str(&format!(
                    "  {} {} kept (documentation-only)\n",
                    "i".blue().bold(),
                    name
                ));
            }
        }

        if !changes.warnings.is_empty() {
            out.push_str(&Self::section_header("Warnings"));
            for warning in &changes.warnings {
                out.push_str(&format!("  {} {}\n", "!".yellow().bold(), warning));
            }
        }

        out.push('\n');
        out.push_str(&Self::format_summary(&changes.summary()));
        out.push_str(&Self::footer());
        out
    }

    /// Format as JSON
    pub fn format_json(output: &SyncDocsOutput, document: &Path) -> String {
        let changes = &output.change_set;
        let path = document.display().to_string();
        let report = JsonReport {
            generated_at: Utc::now().to_rfc3339(),
            document: &path,
            document_existed: output.document_existed,
            has_changes: output.has_changes(),
            keys: output.keys.len(),
            summary: changes.summary(),
            environments: &changes.environments,
            sections: changes.sections.iter().map(JsonSection::from).collect(),
            unmapped: &changes.unmapped,
            intentionally_undocumented: &changes.intentionally_undocumented,
            unrecognized_tables: &changes.unrecognized_tables,
            unterminated_views: &changes.unterminated_views,
            warnings: &changes.warnings,
        };
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the document changes as a colored unified diff
    pub fn format_diff(output: &SyncDocsOutput, document: &Path) -> String {
        let path = document.display().to_string();
        diff::colorize(&diff::unified_diff(&output.original, &output.rendered, &path))
    }

    fn format_section(section: &SectionChanges) -> String {
        let mut out = String::new();
        let title = if section.is_new() {
            format!("{} {}", section.title, "(new section)".dimmed())
        } else {
            section.title.clone()
        };
        out.push_str(&Self::section_header(&title));

        for addition in &section.to_add {
            out.push_str(&Self::format_addition(addition));
        }
        for removal in &section.to_remove {
            out.push_str(&format!("  {} {}\n", "-".red().bold(), removal.name.red()));
        }
        for update in &section.to_update {
            out.push_str(&format!("  {} {}\n", "~".yellow().bold(), update.name));
            for field in &update.diffs {
                out.push_str(&format!(
                    "      {}: {} -> {}\n",
                    field.field.as_str(),
                    Self::cell(&field.old).dimmed(),
                    Self::cell(&field.new)
                ));
            }
        }
        if let Some(view) = &section.environment_view {
            let action = if view.is_removal() {
                "environment view removed".to_string()
            } else {
                format!("environment view updated ({} keys)", view.rows.len())
            };
            out.push_str(&format!("  {} {}\n", "*".cyan().bold(), action));
        }
        if section.unchanged > 0 {
            out.push_str(&format!(
                "  {}\n",
                format!("{} unchanged", section.unchanged).dimmed()
            ));
        }
        out
    }

    fn format_addition(addition: &EntryAddition) -> String {
        let required = if addition.required { "required" } else { "optional" };
        format!(
            "  {} {}  {}  {}  {}\n",
            "+".green().bold(),
            addition.name.green(),
            addition.value_type,
            required,
            Self::cell(&addition.example).dimmed()
        )
    }

    fn format_summary(summary: &ChangeSummary) -> String {
        if summary.added + summary.removed + summary.updated + summary.environment_views == 0 {
            return format!("{}\n", "Document is up to date.".green().bold());
        }
        let mut parts = vec![
            format!("{} added", summary.added),
            format!("{} removed", summary.removed),
            format!("{} updated", summary.updated),
            format!("{} unchanged", summary.unchanged),
        ];
        if summary.new_sections > 0 {
            parts.push(format!("{} new sections", summary.new_sections));
        }
        if summary.environment_views > 0 {
            parts.push(format!("{} environment views", summary.environment_views));
        }
        format!("{} {}\n", "Summary:".cyan().bold(), parts.join(", "))
    }

    fn cell(value: &str) -> String {
        if value.is_empty() {
            "(empty)".to_string()
        } else {
            truncate(value, MAX_CELL_WIDTH)
        }
    }

    fn join_environments(environments: &[Environment]) -> String {
        environments
            .iter()
            .map(Environment::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &SyncDocsOutput, document: &Path) -> String {
        Self::format(output, document)
    }

    fn format_json(&self, output: &SyncDocsOutput, document: &Path) -> String {
        Self::format_json(output, document)
    }

    fn format_diff(&self, output: &SyncDocsOutput, document: &Path) -> String {
        Self::format_diff(output, document)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    document: &'a str,
    document_existed: bool,
    has_changes: bool,
    keys: usize,
    summary: ChangeSummary,
    environments: &'a [Environment],
    sections: Vec<JsonSection<'a>>,
    unmapped: &'a [AmbiguousMappingError],
    intentionally_undocumented: &'a [String],
    unrecognized_tables: &'a [UnrecognizedTableError],
    unterminated_views: &'a [UnterminatedViewError],
    warnings: &'a [SecretExposureWarning],
}

#[derive(Serialize)]
struct JsonSection<'a> {
    title: &'a str,
    new_section: bool,
    to_add: &'a [EntryAddition],
    to_remove: &'a [EntryRemoval],
    to_update: &'a [EntryUpdate],
    unchanged: usize,
    /// `updated` or `removed` when the environment view changes
    environment_view: Option<&'static str>,
}

impl<'a> From<&'a SectionChanges> for JsonSection<'a> {
    fn from(section: &'a SectionChanges) -> Self {
        Self {
            title: &section.title,
            new_section: section.is_new(),
            to_add: &section.to_add,
            to_remove: &section.to_remove,
            to_update: &section.to_update,
            unchanged: section.unchanged,
            environment_view: section
                .environment_view
                .as_ref()
                .map(|view| if view.is_removal() { "removed" } else { "updated" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_domain::{
        ConfigSource, SectionMapping, SectionRule, SourceFormat, SourceTag, SyncOptions, classify,
        load_keys, parse_document, reconcile, render,
    };

    const DOC: &str = "# Configuration\n\n## Redis\n\n| Name | Type | Required | Example |\n|---|---|---|---|\n| `redis.port` | int | No | `6379` |\n";

    fn sync(original: &str, properties: &str) -> SyncDocsOutput {
        let options = SyncOptions::default();
        let sources = vec![ConfigSource::new(
            "application.properties",
            SourceTag::Environment(Environment::Local),
            SourceFormat::Properties,
            properties,
        )];
        let keys = classify(load_keys(&sources, &options).unwrap());
        let document = parse_document(original);
        let mapping = SectionMapping::new(vec![SectionRule::new("Redis", &["redis"])]);
        let change_set = reconcile(&keys, &document, &mapping, &options);
        let rendered = render(&document, &change_set);
        SyncDocsOutput {
            original: original.to_string(),
            rendered,
            document_existed: true,
            document,
            keys,
            change_set,
        }
    }

    #[test]
    fn test_format_lists_section_changes() {
        let output = sync(DOC, "redis.host=localhost\n");
        let text = ConsoleFormatter::format(&output, Path::new("docs/CONFIGURATION.md"));

        assert!(text.contains("docs/CONFIGURATION.md"));
        assert!(text.contains("Redis"));
        assert!(text.contains("redis.host"));
        assert!(text.contains("redis.port"));
        assert!(text.contains("1 added"));
        assert!(text.contains("1 removed"));
    }

    #[test]
    fn test_format_up_to_date() {
        let output = sync(DOC, "redis.port=6379\n");
        let text = ConsoleFormatter::format(&output, Path::new("doc.md"));

        assert!(!output.has_changes());
        assert!(text.contains("Document is up to date."));
    }

    #[test]
    fn test_format_json_report() {
        let output = sync(DOC, "redis.host=localhost\n");
        let json = ConsoleFormatter::format_json(&output, Path::new("doc.md"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["generated_at"].as_str().is_some());
        assert_eq!(value["document"], "doc.md");
        assert_eq!(value["has_changes"], true);
        assert_eq!(value["summary"]["added"], 1);
        assert_eq!(value["summary"]["removed"], 1);
        assert_eq!(value["sections"][0]["title"], "Redis");
        assert_eq!(value["sections"][0]["to_add"][0]["name"], "redis.host");
        assert_eq!(value["sections"][0]["to_remove"][0]["name"], "redis.port");
        assert!(value["sections"][0]["to_remove"][0].get("location").is_none());
    }

    #[test]
    fn test_unterminated_view_needs_review() {
        let doc = format!("{DOC}\n<!-- docsync:environments:begin -->\n\n## Operations\n\nKeep me.\n");
        let output = sync(&doc, "redis.port=6379\n");

        let text = ConsoleFormatter::format(&output, Path::new("doc.md"));
        assert!(text.contains("Needs review"));
        assert!(text.contains("Environment view in section 'Redis' at line 9 has no end marker"));
        assert!(text.contains("Document is up to date."));

        let json = ConsoleFormatter::format_json(&output, Path::new("doc.md"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["unterminated_views"], 1);
        assert_eq!(value["unterminated_views"][0]["section"], "Redis");
        assert_eq!(value["unterminated_views"][0]["line"], 9);
    }

    #[test]
    fn test_format_diff() {
        let output = sync(DOC, "redis.host=localhost\n");
        let diff = ConsoleFormatter::format_diff(&output, Path::new("doc.md"));

        assert!(diff.contains("a/doc.md"));
        assert!(diff.contains("redis.host"));
        assert!(diff.contains("redis.port"));
    }

    #[test]
    fn test_format_diff_empty_when_unchanged() {
        let output = sync(DOC, "redis.port=6379\n");
        assert_eq!(ConsoleFormatter::format_diff(&output, Path::new("doc.md")), "");
    }

    #[test]
    fn test_cell_truncates_long_values() {
        assert_eq!(ConsoleFormatter::cell(""), "(empty)");
        let long = "x".repeat(100);
        assert!(ConsoleFormatter::cell(&long).ends_with("..."));
        assert_eq!(ConsoleFormatter::cell(&long).len(), MAX_CELL_WIDTH);
    }
}

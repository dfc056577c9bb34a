//! Renderer: applies a ChangeSet to the parsed document.
//!
//! Every line outside the rows and blocks named by the ChangeSet is emitted
//! exactly as parsed. Secret-like examples are redacted here again,
//! regardless of what the ChangeSet carries.

use crate::classify::REDACTED_PLACEHOLDER;
use crate::core::string::code_span;
use crate::document::markdown::{
    default_columns, default_table_head, environment_view_lines, format_row, strip_eol,
};
use crate::document::{Block, ColumnMap, Document, DocumentSection, EnvironmentRow, LineEnding, TableRow};
use crate::reconcile::{
    ChangeSet, EntryAddition, EntryUpdate, EnvironmentViewChange, Field, RowRef, SectionChanges,
    SectionTarget, required_cell,
};
use crate::source::Environment;
use tracing::debug;

/// Produce the updated document text.
pub fn render(document: &Document, changes: &ChangeSet) -> String {
    let eol = document.line_ending;
    let proposed: Vec<&SectionChanges> = changes
        .sections
        .iter()
        .filter(|s| s.is_new() && !s.to_add.is_empty())
        .collect();
    let last = document.sections.len().saturating_sub(1);
    let mut lines: Vec<String> = Vec::new();

    for (index, section) in document.sections.iter().enumerate() {
        if let Some(heading) = &section.heading {
            lines.push(heading.line.clone());
        }
        let section_changes = changes
            .sections
            .iter()
            .find(|s| s.target == SectionTarget::Existing(index) && s.has_changes());
        match section_changes {
            Some(section_changes) => {
                let renderer = SectionRenderer {
                    index,
                    section,
                    changes: section_changes,
                    environments: &changes.environments,
                    eol,
                };
                lines.extend(renderer.render(index < last || !proposed.is_empty()));
            }
            None => lines.extend(verbatim(section.blocks.iter())),
        }
    }

    for section in proposed {
        if let SectionTarget::New { level } = section.target {
            append_section(&mut lines, section, level, &changes.environments, eol);
        }
    }

    debug!(lines = lines.len(), "document_rendered");
    assemble(&lines, eol)
}

struct SectionRenderer<'a> {
    index: usize,
    section: &'a DocumentSection,
    changes: &'a SectionChanges,
    environments: &'a [Environment],
    eol: LineEnding,
}

impl SectionRenderer<'_> {
    /// Lines of the section body. `followed` is set when more content comes after it.
    fn render(&self, followed: bool) -> Vec<String> {
        let add_table = self.section.tables().next().map(|(b, _)| b);
        let existing_view = self.section.environment_view().map(|(b, _)| b);
        let mut pending_view = self
            .changes
            .environment_view
            .as_ref()
            .filter(|v| !v.is_removal() && existing_view.is_none());
        let mut out: Vec<String> = Vec::new();

        for (b, block) in self.section.blocks.iter().enumerate() {
            match block {
                Block::Table(table) => {
                    out.push(table.header.clone());
                    out.push(table.separator.clone());
                    for (r, row) in table.rows.iter().enumerate() {
                        let location = RowRef {
                            section: self.index,
                            block: b,
                            row: r,
                        };
                        if self.changes.is_removed(location) {
                            continue;
                        }
                        match self.changes.update_at(location) {
                            Some(update) => out.push(updated_row(row, &table.columns, update, self.eol)),
                            None => out.push(row.line.clone()),
                        }
                    }
                    if Some(b) == add_table {
                        out.extend(self.added_rows(&table.columns));
                        if let Some(view) = pending_view.take() {
                            out.push(self.eol.as_str().to_string());
                            out.extend(view_lines(view, self.environments, self.eol));
                        }
                    }
                }
                Block::EnvironmentView(_) if Some(b) == existing_view => {
                    match &self.changes.environment_view {
                        Some(view) if view.is_removal() => {
                            if out.last().is_some_and(|l| is_blank(l)) {
                                out.pop();
                            }
                        }
                        Some(view) => out.extend(view_lines(view, self.environments, self.eol)),
                        None => out.extend(verbatim(std::iter::once(block))),
                    }
                }
                other => out.extend(verbatim(std::iter::once(other))),
            }
        }

        let mut inserted: Vec<String> = Vec::new();
        if add_table.is_none() && !self.changes.to_add.is_empty() {
            inserted.extend(default_table_head(self.eol));
            inserted.extend(self.added_rows(&default_columns()));
        }
        if let Some(view) = pending_view {
            if !inserted.is_empty() {
                inserted.push(self.eol.as_str().to_string());
            }
            inserted.extend(view_lines(view, self.environments, self.eol));
        }
        if !inserted.is_empty() {
            let at = out.iter().rposition(|l| !is_blank(l)).map_or(0, |i| i + 1);
            let trailing = at == out.len();
            inserted.insert(0, self.eol.as_str().to_string());
            if trailing && followed {
                inserted.push(self.eol.as_str().to_string());
            }
            let tail = out.split_off(at);
            out.extend(inserted);
            out.extend(tail);
        }

        out
    }

    fn added_rows<'c>(&'c self, columns: &'c ColumnMap) -> impl Iterator<Item = String> + 'c {
        self.changes
            .to_add
            .iter()
            .map(move |addition| added_row(addition, columns, self.eol))
    }
}

fn verbatim<'a>(blocks: impl Iterator<Item = &'a Block>) -> Vec<String> {
    blocks
        .flat_map(|b| b.lines())
        .map(str::to_string)
        .collect()
}

fn is_blank(line: &str) -> bool {
    strip_eol(line).trim().is_empty()
}

fn example_cell(example: &str, secret: bool) -> String {
    code_span(if secret { REDACTED_PLACEHOLDER } else { example })
}

/// Rewrite only the cells of the differing fields; the row keeps its terminator.
fn updated_row(row: &TableRow, columns: &ColumnMap, update: &EntryUpdate, eol: LineEnding) -> String {
    let mut cells = row.cells.clone();
    if cells.len() < columns.width {
        cells.resize(columns.width, String::new());
    }
    for diff in &update.diffs {
        let (index, value) = match diff.field {
            Field::Type => (columns.value_type, diff.new.clone()),
            Field::Required => (columns.required, diff.new.clone()),
            Field::Example => (columns.example, example_cell(&diff.new, update.secret)),
        };
        if let Some(index) = index {
            cells[index] = value;
        }
    }
    let line = format_row(&cells, eol);
    if row.line.ends_with('\n') {
        line
    } else {
        strip_eol(&line).to_string()
    }
}

fn added_row(addition: &EntryAddition, columns: &ColumnMap, eol: LineEnding) -> String {
    let mut cells = vec![String::new(); columns.width.max(columns.name + 1)];
    cells[columns.name] = code_span(&addition.name);
    if let Some(index) = columns.value_type {
        cells[index] = addition.value_type.as_str().to_string();
    }
    if let Some(index) = columns.required {
        cells[index] = required_cell(addition.required).to_string();
    }
    if let Some(index) = columns.example {
        cells[index] = example_cell(&addition.example, addition.secret);
    }
    format_row(&cells, eol)
}

fn view_lines(view: &EnvironmentViewChange, environments: &[Environment], eol: LineEnding) -> Vec<String> {
    let rows: Vec<EnvironmentRow> = view
        .rows
        .iter()
        .map(|row| {
            if !view.secrets.contains(&row.name) {
                return row.clone();
            }
            EnvironmentRow {
                name: row.name.clone(),
                values: row
                    .values
                    .iter()
                    .map(|v| {
                        v.as_ref().map(|v| {
                            if v.is_empty() {
                                String::new()
                            } else {
                                REDACTED_PLACEHOLDER.to_string()
                            }
                        })
                    })
                    .collect(),
            }
        })
        .collect();
    environment_view_lines(environments, &rows, eol)
}

fn append_section(
    lines: &mut Vec<String>,
    section: &SectionChanges,
    level: usize,
    environments: &[Environment],
    eol: LineEnding,
) {
    let nl = eol.as_str();
    if lines.last().is_some_and(|l| !is_blank(l)) {
        lines.push(nl.to_string());
    }
    lines.push(format!("{} {}{}", "#".repeat(level), section.title, nl));
    lines.push(nl.to_string());
    lines.extend(default_table_head(eol));
    let columns = default_columns();
    lines.extend(section.to_add.iter().map(|a| added_row(a, &columns, eol)));
    if let Some(view) = section.environment_view.as_ref().filter(|v| !v.is_removal()) {
        lines.push(nl.to_string());
        lines.extend(view_lines(view, environments, eol));
    }
}

/// Join lines, terminating any line that is followed by another.
fn assemble(lines: &[String], eol: LineEnding) -> String {
    let mut out = String::new();
    for line in lines {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol.as_str());
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::config::{SectionMapping, SectionRule, SyncOptions};
    use crate::document::parse_document;
    use crate::reconcile::reconcile;
    use crate::source::{ConfigSource, ValueType, load_keys};

    fn mapping() -> SectionMapping {
        SectionMapping::new(vec![
            SectionRule::new("Redis Configuration", &["REDIS_", "quarkus.redis"]),
            SectionRule::new("OpenTelemetry Configuration", &["quarkus.otel"]),
            SectionRule::new("Application Configuration", &["app."]),
        ])
    }

    fn local(content: &str) -> ConfigSource {
        ConfigSource::properties("application.properties", Environment::Local, content)
    }

    fn prod(content: &str) -> ConfigSource {
        ConfigSource::properties("application-prod.properties", Environment::Prod, content)
    }

    fn changes_for(sources: &[ConfigSource], doc: &str) -> (Document, ChangeSet) {
        let options = SyncOptions::default();
        let keys = classify(load_keys(sources, &options).unwrap());
        let document = parse_document(doc);
        let changes = reconcile(&keys, &document, &mapping(), &options);
        (document, changes)
    }

    fn sync(sources: &[ConfigSource], doc: &str) -> String {
        let (document, changes) = changes_for(sources, doc);
        render(&document, &changes)
    }

    fn assert_idempotent(sources: &[ConfigSource], doc: &str) -> String {
        let rendered = sync(sources, doc);
        let (_, second) = changes_for(sources, &rendered);
        assert!(second.is_empty(), "second run not empty: {:?}", second.sections);
        assert_eq!(sync(sources, &rendered), rendered);
        rendered
    }

    const REDIS_DOC: &str = "## Redis Configuration\n\
\n\
Prose.\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `REDIS_PORT` | integer | No | Port | `6379` |\n\
| `OLD_FLAG` | boolean | No | Legacy | `false` |\n\
\n\
Trailing prose.\n";

    #[test]
    fn test_empty_change_set_renders_byte_identical() {
        let doc = "# Title\n\nSome *prose*  with  spacing.\n\n## Redis Configuration\n\n| Name | Type |\n|:--|--:|\n|  `REDIS_PORT`|integer|\n";
        let (document, changes) = changes_for(&[local("REDIS_PORT=6379\n")], doc);
        assert!(changes.is_empty());
        assert_eq!(render(&document, &changes), doc);
    }

    #[test]
    fn test_added_row_appended_to_section_table() {
        let sources = [
            local("REDIS_PORT=6379\nREDIS_HOST=localhost\n"),
            ConfigSource::template(".env.example", "REDIS_HOST=\n"),
        ];
        let rendered = assert_idempotent(&sources, REDIS_DOC);
        assert_eq!(
            rendered,
            "## Redis Configuration\n\
\n\
Prose.\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `REDIS_PORT` | integer | No | Port | `6379` |\n\
| `REDIS_HOST` | string | Yes |  | `localhost` |\n\
\n\
Trailing prose.\n"
        );
    }

    #[test]
    fn test_update_and_remove_touch_only_their_rows() {
        let rendered = assert_idempotent(&[local("REDIS_PORT=6380\n")], REDIS_DOC);
        assert_eq!(
            rendered,
            "## Redis Configuration\n\
\n\
Prose.\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `REDIS_PORT` | integer | No | Port | `6380` |\n\
\n\
Trailing prose.\n"
        );
    }

    #[test]
    fn test_new_section_in_empty_document() {
        let sources = [
            local("REDIS_HOST=localhost\n"),
            ConfigSource::template(".env.example", "REDIS_HOST=\n"),
        ];
        let rendered = assert_idempotent(&sources, "");
        assert_eq!(
            rendered,
            "## Redis Configuration\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `REDIS_HOST` | string | Yes |  | `localhost` |\n"
        );
    }

    #[test]
    fn test_environment_variant_view() {
        let sources = [
            local("quarkus.otel.traces.sampler.arg=1.0\n"),
            prod("quarkus.otel.traces.sampler.arg=0.1\n"),
        ];
        let rendered = assert_idempotent(&sources, "");
        assert_eq!(
            rendered,
            "## OpenTelemetry Configuration\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `quarkus.otel.traces.sampler.arg` | string | No |  | `(varies by environment)` |\n\
\n\
<!-- docsync:environments:begin -->\n\
**Differences by environment**\n\
\n\
| Name | local | prod |\n\
|---|---|---|\n\
| `quarkus.otel.traces.sampler.arg` | `1.0` | `0.1` |\n\
<!-- docsync:environments:end -->\n"
        );

        let changed = [
            local("quarkus.otel.traces.sampler.arg=1.0\n"),
            prod("quarkus.otel.traces.sampler.arg=0.5\n"),
        ];
        let updated = assert_idempotent(&changed, &rendered);
        assert!(updated.contains("| `quarkus.otel.traces.sampler.arg` | `1.0` | `0.5` |\n"));
        assert_eq!(updated.matches("docsync:environments:begin").count(), 1);
    }

    #[test]
    fn test_environment_view_inserted_after_existing_table_and_removed() {
        let sources = [local("REDIS_PORT=6379\n"), prod("REDIS_PORT=6380\n")];
        let rendered = assert_idempotent(&sources, REDIS_DOC);
        assert!(rendered.contains(
            "| `REDIS_PORT` | integer | No | Port | `(varies by environment)` |\n\
\n\
<!-- docsync:environments:begin -->\n"
        ));
        assert!(rendered.ends_with("<!-- docsync:environments:end -->\n\nTrailing prose.\n"));

        let flattened = assert_idempotent(&[local("REDIS_PORT=6379\n")], &rendered);
        assert!(!flattened.contains("docsync:environments"));
        assert!(flattened.ends_with("| `REDIS_PORT` | integer | No | Port | `6379` |\n\nTrailing prose.\n"));
    }

    #[test]
    fn test_secret_values_never_rendered() {
        let doc = "## Redis Configuration\n\n| Name | Type | Example |\n|---|---|---|\n| `REDIS_PASSWORD` | secret | `hunter2` |\n";
        let sources = [local("REDIS_PASSWORD=s3cret\nREDIS_TOKEN=abc\n"), prod("REDIS_TOKEN=xyz\n")];
        let rendered = assert_idempotent(&sources, doc);
        for leaked in ["hunter2", "s3cret", "abc", "xyz"] {
            assert!(!rendered.contains(leaked), "{leaked} leaked");
        }
        assert!(rendered.contains("| `REDIS_PASSWORD` | secret | `REDACTED` |\n"));
        assert!(rendered.contains("| `REDIS_TOKEN` | `REDACTED` | `REDACTED` |\n"));
    }

    #[test]
    fn test_render_redacts_even_when_change_set_carries_literal() {
        let document = parse_document("");
        let mut section = SectionChanges::proposed("Secrets", 2);
        section.to_add.push(EntryAddition {
            name: "API_KEY".to_string(),
            value_type: ValueType::Secret,
            required: true,
            example: "live-key-123".to_string(),
            secret: true,
        });
        section.environment_view = Some(EnvironmentViewChange {
            rows: vec![EnvironmentRow {
                name: "API_KEY".to_string(),
                values: vec![Some("live-key-123".to_string()), Some(String::new())],
            }],
            secrets: vec!["API_KEY".to_string()],
        });
        let changes = ChangeSet {
            sections: vec![section],
            environments: vec![Environment::Local, Environment::Prod],
            ..Default::default()
        };

        let rendered = render(&document, &changes);
        assert!(!rendered.contains("live-key-123"));
        assert!(rendered.contains("| `API_KEY` | secret | Yes |  | `REDACTED` |\n"));
        assert!(rendered.contains("| `API_KEY` | `REDACTED` | (empty) |\n"));
    }

    #[test]
    fn test_section_without_table_gets_one() {
        let doc = "## Application Configuration\n\nSettings for the app.\n\n## Other\n\nText.\n";
        let rendered = assert_idempotent(&[local("app.name=demo\n")], doc);
        assert_eq!(
            rendered,
            "## Application Configuration\n\
\n\
Settings for the app.\n\
\n\
| Name | Type | Required | Description | Example |\n\
|---|---|---|---|---|\n\
| `app.name` | string | No |  | `demo` |\n\
\n\
## Other\n\
\n\
Text.\n"
        );
    }

    #[test]
    fn test_heading_only_section_and_missing_final_newline() {
        let doc = "# Config\n\nIntro.\n## Application Configuration";
        let rendered = assert_idempotent(&[local("app.name=demo\nmisc=1\n")], doc);
        assert!(rendered.starts_with("# Config\n\nIntro.\n## Application Configuration\n\n| Name |"));
        assert!(rendered.contains("| `app.name` | string | No |  | `demo` |\n\n## Uncategorized\n\n"));
        assert!(rendered.ends_with("| `misc` | integer | No |  | `1` |\n"));
    }

    #[test]
    fn test_crlf_documents_stay_crlf() {
        let doc = "## Redis Configuration\r\n\r\n| Name | Type |\r\n|---|---|\r\n| `REDIS_PORT` | integer |\r\n";
        let rendered = assert_idempotent(&[local("REDIS_PORT=1\nREDIS_HOST=h\n")], doc);
        assert_eq!(
            rendered,
            "## Redis Configuration\r\n\r\n| Name | Type |\r\n|---|---|\r\n| `REDIS_PORT` | integer |\r\n| `REDIS_HOST` | string |\r\n"
        );
    }

    const UNTERMINATED_VIEW_DOC: &str = "## Redis Configuration\n\
\n\
| Name | Type |\n\
|---|---|\n\
| `REDIS_PORT` | integer |\n\
\n\
<!-- docsync:environments:begin -->\n\
\n\
## Operations\n\
\n\
Important hand-written prose.\n";

    #[test]
    fn test_unterminated_view_keeps_following_sections() {
        let (document, changes) = changes_for(&[local("REDIS_PORT=6379\n")], UNTERMINATED_VIEW_DOC);
        assert!(changes.is_empty());
        assert_eq!(changes.summary().unterminated_views, 1);
        assert_eq!(changes.unterminated_views[0].section, "Redis Configuration");
        assert_eq!(render(&document, &changes), UNTERMINATED_VIEW_DOC);
    }

    #[test]
    fn test_unterminated_view_section_gets_no_new_view() {
        let sources = [local("REDIS_PORT=6379\n"), prod("REDIS_PORT=6380\n")];
        let rendered = assert_idempotent(&sources, UNTERMINATED_VIEW_DOC);

        assert_eq!(rendered, UNTERMINATED_VIEW_DOC);
    }

    #[test]
    fn test_table_without_outer_pipes_is_reconciled_in_place() {
        let doc = "## Redis Configuration\n\nName | Type\n---|---\n`REDIS_PORT` | integer\n";
        let (document, changes) = changes_for(&[local("REDIS_PORT=6379\n")], doc);
        let summary = changes.summary();
        assert_eq!(summary.added, 0);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(render(&document, &changes), doc);

        let rendered = assert_idempotent(&[local("REDIS_PORT=6379\nREDIS_HOST=localhost\n")], doc);
        assert_eq!(rendered.matches("Name | Type").count(), 1);
        assert_eq!(rendered.matches("REDIS_PORT").count(), 1);
        assert!(rendered.contains("`REDIS_HOST`"));
    }

    #[test]
    fn test_prose_and_opaque_tables_survive() {
        let doc = "# Configuration\n\n> Note: keep   this.\n\n## Endpoints\n\n| Path | Purpose |\n|---|---|\n| /q/health | Health |\n\n## Redis Configuration\n\n| Name | Type |\n|---|---|\n| `OLD` | string |\n";
        let rendered = assert_idempotent(&[local("REDIS_HOST=h\n")], doc);
        assert!(rendered.starts_with(
            "# Configuration\n\n> Note: keep   this.\n\n## Endpoints\n\n| Path | Purpose |\n|---|---|\n| /q/health | Health |\n\n## Redis Configuration\n\n"
        ));
        assert!(!rendered.contains("`OLD`"));
    }
}

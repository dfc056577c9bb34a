//! Markdown table helpers and the generated environment view format.

use super::entities::{ColumnMap, EnvironmentRow, LineEnding};
use crate::core::string::code_span;
use crate::source::Environment;
use regex::Regex;
use std::sync::LazyLock;

/// Opening marker of the generated environment view.
pub const ENV_VIEW_BEGIN: &str = "<!-- docsync:environments:begin -->";
/// Closing marker of the generated environment view.
pub const ENV_VIEW_END: &str = "<!-- docsync:environments:end -->";
/// Caption line inside the environment view.
pub const ENV_VIEW_CAPTION: &str = "**Differences by environment**";

/// Header cells of tables created for new sections.
pub const DEFAULT_HEADER: [&str; 5] = ["Name", "Type", "Required", "Description", "Example"];

static SEPARATOR_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").expect("valid regex")
});

/// Strip the line terminator from a stored line.
pub fn strip_eol(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line)
}

/// Whether a line can be a table row: non-blank with an unescaped `|`.
/// Outer pipes are optional.
pub fn is_table_row(line: &str) -> bool {
    let content = strip_eol(line);
    if content.trim().is_empty() {
        return false;
    }
    let mut escaped = false;
    for c in content.chars() {
        match c {
            '|' if !escaped => return true,
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    false
}

/// Whether `header` and `separator` open a table: a row followed by a
/// separator with the same number of cells.
pub fn is_table_start(header: &str, separator: &str) -> bool {
    is_table_row(header)
        && is_separator_row(separator)
        && split_cells(header).len() == split_cells(separator).len()
}

/// Whether a line is a header separator row (`|---|:--:|`).
pub fn is_separator_row(line: &str) -> bool {
    let content = strip_eol(line);
    content.contains('-') && content.contains('|') && SEPARATOR_ROW.is_match(content)
}

/// Split a table row into trimmed raw cells, honoring `\|` escapes.
pub fn split_cells(line: &str) -> Vec<String> {
    let content = strip_eol(line).trim();
    let content = content.strip_prefix('|').unwrap_or(content);
    let content = match content.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => content,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('\\');
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Cell text with escapes removed.
pub fn unescape_cell(cell: &str) -> String {
    cell.replace("\\|", "|")
}

/// Format cells as a table row terminated by `eol`.
pub fn format_row(cells: &[String], eol: LineEnding) -> String {
    format!("| {} |{}", cells.join(" | "), eol.as_str())
}

fn separator_row(width: usize, eol: LineEnding) -> String {
    format!("|{}{}", "---|".repeat(width), eol.as_str())
}

/// Header and separator lines for a newly created entry table.
pub fn default_table_head(eol: LineEnding) -> Vec<String> {
    let header: Vec<String> = DEFAULT_HEADER.iter().map(|h| h.to_string()).collect();
    vec![format_row(&header, eol), separator_row(header.len(), eol)]
}

/// Column map matching [`default_table_head`].
pub fn default_columns() -> ColumnMap {
    ColumnMap {
        name: 0,
        value_type: Some(1),
        required: Some(2),
        description: Some(3),
        example: Some(4),
        width: DEFAULT_HEADER.len(),
    }
}

/// Resolve column meanings from header cells; `None` without a name column.
pub fn resolve_columns(header: &[String]) -> Option<ColumnMap> {
    let mut name = None;
    let mut value_type = None;
    let mut required = None;
    let mut description = None;
    let mut example = None;

    for (index, cell) in header.iter().enumerate() {
        let label = normalize_header(cell);
        let slot = match label.as_str() {
            "name" | "key" | "property" | "property name" | "variable" | "variable name"
            | "env var" | "environment variable" | "config key" | "configuration key"
            | "setting" => &mut name,
            "type" | "value type" | "data type" => &mut value_type,
            "required" | "mandatory" => &mut required,
            "description" | "desc" | "purpose" | "notes" | "meaning" => &mut description,
            "example" | "example value" | "default" | "default value" | "value" | "sample" => {
                &mut example
            }
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(index);
        }
    }

    Some(ColumnMap {
        name: name?,
        value_type,
        required,
        description,
        example,
        width: header.len(),
    })
}

fn normalize_header(cell: &str) -> String {
    cell.trim()
        .trim_matches(|c| c == '*' || c == '_' || c == '`')
        .trim_end_matches('?')
        .trim()
        .to_lowercase()
}

/// Lines of the generated environment view, including both markers.
pub fn environment_view_lines(
    environments: &[Environment],
    rows: &[EnvironmentRow],
    eol: LineEnding,
) -> Vec<String> {
    let nl = eol.as_str();
    let mut header = vec!["Name".to_string()];
    header.extend(environments.iter().map(|e| e.as_str().to_string()));

    let mut lines = vec![
        format!("{}{}", ENV_VIEW_BEGIN, nl),
        format!("{}{}", ENV_VIEW_CAPTION, nl),
        nl.to_string(),
        format_row(&header, eol),
        separator_row(header.len(), eol),
    ];
    for row in rows {
        let mut cells = vec![code_span(&row.name)];
        cells.extend(row.values.iter().map(|v| match v.as_deref() {
            None => String::new(),
            Some("") => "(empty)".to_string(),
            Some(value) => code_span(value),
        }));
        lines.push(format_row(&cells, eol));
    }
    lines.push(format!("{}{}", ENV_VIEW_END, nl));
    lines
}

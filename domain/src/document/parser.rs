//! Lossless Markdown parsing into sections, prose and tables.
//!
//! Headings (ATX, outside fenced code) open sections. A row containing `|`
//! directly followed by a separator row of the same width starts a table;
//! outer pipes are optional. Tables whose header has no name column are
//! kept as opaque blocks and reported, never dropped. An environment view
//! begin marker without an end marker before the next heading stays prose.

use super::entities::{
    Block, Document, DocumentSection, DocumentedEntry, EntryTable, EnvironmentView, Heading,
    LineEnding, TableRow,
};
use super::markdown::{
    ENV_VIEW_BEGIN, ENV_VIEW_END, is_table_row, is_table_start, resolve_columns, split_cells,
    strip_eol, unescape_cell,
};
use crate::core::error::{UnrecognizedTableError, UnterminatedViewError};
use crate::core::string::strip_code_span;
use tracing::debug;

/// Parse documentation text. Parsing never fails; unrecognized tables are
/// collected in [`Document::unrecognized`] and unterminated environment
/// views in [`Document::unterminated_views`].
pub fn parse_document(text: &str) -> Document {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut document = Document {
        sections: vec![DocumentSection::default()],
        line_ending: LineEnding::detect(text),
        unrecognized: Vec::new(),
        unterminated_views: Vec::new(),
    };
    let mut prose: Vec<String> = Vec::new();
    let mut fence: Option<String> = None;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let content = strip_eol(line);

        if let Some(marker) = &fence {
            if content.trim_start().starts_with(marker.as_str()) {
                fence = None;
            }
            prose.push(line.to_string());
            i += 1;
            continue;
        }

        if let Some(marker) = fence_marker(content) {
            fence = Some(marker);
            prose.push(line.to_string());
            i += 1;
            continue;
        }

        if content.trim() == ENV_VIEW_BEGIN {
            match view_end(&lines, i) {
                Some(end) => {
                    flush_prose(&mut document, &mut prose);
                    let view = lines[i..=end].iter().map(|l| l.to_string()).collect();
                    current(&mut document)
                        .blocks
                        .push(Block::EnvironmentView(EnvironmentView { lines: view }));
                    i = end + 1;
                }
                None => {
                    let section = current(&mut document).title().to_string();
                    document
                        .unterminated_views
                        .push(UnterminatedViewError { section, line: i + 1 });
                    prose.push(line.to_string());
                    i += 1;
                }
            }
            continue;
        }

        if let Some(heading) = parse_heading(line) {
            flush_prose(&mut document, &mut prose);
            document.sections.push(DocumentSection {
                heading: Some(heading),
                blocks: Vec::new(),
            });
            i += 1;
            continue;
        }

        if i + 1 < lines.len() && is_table_start(line, lines[i + 1]) {
            flush_prose(&mut document, &mut prose);
            let mut end = i + 2;
            while end < lines.len() && is_table_row(lines[end]) && parse_heading(lines[end]).is_none() {
                end += 1;
            }
            let block = parse_table(&mut document, &lines[i..end], i + 1);
            current(&mut document).blocks.push(block);
            i = end;
            continue;
        }

        prose.push(line.to_string());
        i += 1;
    }

    flush_prose(&mut document, &mut prose);
    debug!(
        sections = document.sections.len(),
        unrecognized = document.unrecognized.len(),
        unterminated_views = document.unterminated_views.len(),
        "document_parsed"
    );
    document
}

fn current(document: &mut Document) -> &mut DocumentSection {
    let last = document.sections.len() - 1;
    &mut document.sections[last]
}

fn flush_prose(document: &mut Document, prose: &mut Vec<String>) {
    if !prose.is_empty() {
        let lines = std::mem::take(prose);
        current(document).blocks.push(Block::Prose(lines));
    }
}

/// Line index of the end marker closing the view opened at `begin`.
///
/// `None` when a heading, a code fence or another begin marker comes first.
fn view_end(lines: &[&str], begin: usize) -> Option<usize> {
    for (index, line) in lines.iter().enumerate().skip(begin + 1) {
        let content = strip_eol(line);
        match content.trim() {
            ENV_VIEW_END => return Some(index),
            ENV_VIEW_BEGIN => return None,
            _ if parse_heading(line).is_some() || fence_marker(content).is_some() => return None,
            _ => {}
        }
    }
    None
}

fn fence_marker(content: &str) -> Option<String> {
    let trimmed = content.trim_start();
    for marker in ["```", "~~~"] {
        if trimmed.starts_with(marker) {
            let ch = marker.chars().next().unwrap_or('`');
            let len = trimmed.chars().take_while(|c| *c == ch).count();
            return Some(ch.to_string().repeat(len));
        }
    }
    None
}

/// Parse an ATX heading (`## Title`), allowing up to three leading spaces.
fn parse_heading(line: &str) -> Option<Heading> {
    let content = strip_eol(line);
    let indent = content.len() - content.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = &content[indent..];
    let level = rest.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let after = &rest[level..];
    if !after.is_empty() && !after.starts_with([' ', '\t']) {
        return None;
    }

    let mut title = after.trim();
    let closing = title.trim_end_matches('#');
    if closing.is_empty() || closing.ends_with([' ', '\t']) {
        title = closing.trim_end();
    }

    Some(Heading {
        level,
        title: title.to_string(),
        line: line.to_string(),
    })
}

fn parse_table(document: &mut Document, lines: &[&str], first_line: usize) -> Block {
    let header_cells = split_cells(lines[0]);
    let Some(columns) = resolve_columns(&header_cells) else {
        let section = current(document).title().to_string();
        document.unrecognized.push(UnrecognizedTableError {
            section,
            line: first_line,
            header: strip_eol(lines[0]).trim().to_string(),
        });
        return Block::OpaqueTable(lines.iter().map(|l| l.to_string()).collect());
    };

    let rows = lines[2..]
        .iter()
        .map(|line| {
            let cells = split_cells(line);
            let cell = |index: Option<usize>| {
                index
                    .and_then(|i| cells.get(i))
                    .map(|c| unescape_cell(strip_code_span(c)))
            };
            let name = cell(Some(columns.name)).unwrap_or_default();
            let entry = (!name.is_empty()).then(|| DocumentedEntry {
                name,
                documented_type: cell(columns.value_type),
                documented_required: cell(columns.required),
                description: columns
                    .description
                    .and_then(|i| cells.get(i))
                    .map(|c| unescape_cell(c.trim()))
                    .unwrap_or_default(),
                example_value: cell(columns.example).unwrap_or_default(),
            });
            TableRow {
                line: line.to_string(),
                cells,
                entry,
            }
        })
        .collect();

    Block::Table(EntryTable {
        header: lines[0].to_string(),
        separator: lines[1].to_string(),
        columns,
        rows,
    })
}

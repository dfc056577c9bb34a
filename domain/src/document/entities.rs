//! Document model entities.
//!
//! Every line of the source text is kept verbatim (including its line
//! terminator) in exactly one block, so [`Document::to_markdown`] reproduces
//! the input byte for byte.

use crate::config::titles_match;
use crate::core::error::{UnrecognizedTableError, UnterminatedViewError};

/// Line terminator style detected in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// An ATX heading that opens a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub title: String,
    /// The heading line as written
    pub line: String,
}

/// Resolved column positions of an entry table, matched by header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub value_type: Option<usize>,
    pub required: Option<usize>,
    pub description: Option<usize>,
    pub example: Option<usize>,
    /// Number of header cells
    pub width: usize,
}

/// A row already present in a documentation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedEntry {
    pub name: String,
    pub documented_type: Option<String>,
    pub documented_required: Option<String>,
    pub description: String,
    pub example_value: String,
}

impl DocumentedEntry {
    /// Interpret the required cell; `None` when the cell is absent or unreadable.
    pub fn required_flag(&self) -> Option<bool> {
        let raw = self.documented_required.as_deref()?;
        match raw.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "required" | "✓" | "✔" | "✅" | "x" => Some(true),
            "no" | "n" | "false" | "optional" | "-" | "—" | "" => Some(false),
            _ => None,
        }
    }
}

/// One table row: the verbatim line, its raw cells and the parsed entry.
///
/// Rows with an empty name cell carry no entry and are never reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: String,
    pub cells: Vec<String>,
    pub entry: Option<DocumentedEntry>,
}

/// A pipe table whose header has a recognizable name column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTable {
    pub header: String,
    pub separator: String,
    pub columns: ColumnMap,
    pub rows: Vec<TableRow>,
}

impl EntryTable {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [self.header.as_str(), self.separator.as_str()]
            .into_iter()
            .chain(self.rows.iter().map(|r| r.line.as_str()))
    }
}

/// One row of the generated differences-by-environment view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRow {
    pub name: String,
    /// One value per environment column; `None` when the environment does not set the key
    pub values: Vec<Option<String>>,
}

/// The generated environment view block, delimited by marker comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentView {
    pub lines: Vec<String>,
}

/// A contiguous region of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Free-form lines preserved verbatim
    Prose(Vec<String>),
    /// A table reconciled against configuration keys
    Table(EntryTable),
    /// A table without a name column, preserved verbatim
    OpaqueTable(Vec<String>),
    /// Generated environment differences view
    EnvironmentView(EnvironmentView),
}

impl Block {
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Block::Prose(lines) | Block::OpaqueTable(lines) => {
                lines.iter().map(String::as_str).collect()
            }
            Block::Table(table) => table.lines().collect(),
            Block::EnvironmentView(view) => view.lines.iter().map(String::as_str).collect(),
        }
    }
}

/// A titled block of documentation. The preamble before the first heading
/// is a section without a heading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentSection {
    pub heading: Option<Heading>,
    pub blocks: Vec<Block>,
}

impl DocumentSection {
    pub fn title(&self) -> &str {
        self.heading.as_ref().map(|h| h.title.as_str()).unwrap_or("")
    }

    /// Entry tables with their block index.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &EntryTable)> {
        self.blocks.iter().enumerate().filter_map(|(i, b)| match b {
            Block::Table(t) => Some((i, t)),
            _ => None,
        })
    }

    /// Block index of the first environment view, if any.
    pub fn environment_view(&self) -> Option<(usize, &EnvironmentView)> {
        self.blocks.iter().enumerate().find_map(|(i, b)| match b {
            Block::EnvironmentView(v) => Some((i, v)),
            _ => None,
        })
    }

    /// All prose lines of the section, verbatim.
    pub fn prose(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Prose(lines) => Some(lines.concat()),
                _ => None,
            })
            .collect()
    }
}

/// The parsed documentation file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub sections: Vec<DocumentSection>,
    pub line_ending: LineEnding,
    /// Tables kept as opaque prose because no name column was found
    pub unrecognized: Vec<UnrecognizedTableError>,
    /// Environment view begin markers with no matching end marker
    pub unterminated_views: Vec<UnterminatedViewError>,
}

impl Document {
    /// Reassemble the document exactly as parsed.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(heading) = &section.heading {
                out.push_str(&heading.line);
            }
            for block in &section.blocks {
                for line in block.lines() {
                    out.push_str(line);
                }
            }
        }
        out
    }

    /// Index of the first section whose heading matches `title`.
    pub fn find_section(&self, title: &str) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.heading.as_ref().is_some_and(|h| titles_match(&h.title, title)))
    }

    pub fn is_empty(&self) -> bool {
        self.sections
            .iter()
            .all(|s| s.heading.is_none() && s.blocks.iter().all(|b| b.lines().iter().all(|l| l.trim().is_empty())))
    }

    /// Heading level used for sections that do not exist yet.
    pub fn new_section_level(&self) -> usize {
        self.sections
            .iter()
            .filter_map(|s| s.heading.as_ref())
            .find(|h| h.level >= 2)
            .map(|h| h.level)
            .unwrap_or(2)
    }
}

//! Doc Model Parser: the existing documentation as ordered sections.
//!
//! - [`entities`] - sections, blocks, entry tables and documented entries
//! - [`markdown`] - table cell handling and the generated environment view format
//! - [`parser`] - lossless Markdown parsing into a [`Document`]

pub mod entities;
pub mod markdown;
pub mod parser;

pub use entities::{
    Block, ColumnMap, Document, DocumentSection, DocumentedEntry, EntryTable, EnvironmentRow,
    EnvironmentView, Heading, LineEnding, TableRow,
};
pub use parser::parse_document;

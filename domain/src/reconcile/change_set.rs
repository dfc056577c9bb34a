//! ChangeSet value types.
//!
//! A ChangeSet is transient: it is computed from a parsed document and the
//! classified keys, handed to the renderer, and discarded.

use crate::core::error::{
    AmbiguousMappingError, DomainError, SecretExposureWarning, UnrecognizedTableError, UnterminatedViewError,
};
use crate::document::EnvironmentRow;
use crate::source::{Environment, ValueType};
use serde::Serialize;

/// Cell text for a required flag.
pub fn required_cell(required: bool) -> &'static str {
    if required { "Yes" } else { "No" }
}

/// A documented column that can drift from the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Type,
    Required,
    Example,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Required => "required",
            Field::Example => "example",
        }
    }
}

/// Old and new value of one differing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: Field,
    pub old: String,
    pub new: String,
}

impl FieldDiff {
    pub fn new(field: Field, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field,
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Position of a documented row: section, block within it, row within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RowRef {
    pub section: usize,
    pub block: usize,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryUpdate {
    pub name: String,
    #[serde(skip)]
    pub location: RowRef,
    pub diffs: Vec<FieldDiff>,
    /// The key is secret-like; its example is forced to the placeholder on render
    #[serde(skip)]
    pub secret: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRemoval {
    pub name: String,
    #[serde(skip)]
    pub location: RowRef,
}

/// A key with no documented row yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryAddition {
    pub name: String,
    pub value_type: ValueType,
    pub required: bool,
    pub example: String,
    #[serde(skip)]
    pub secret: bool,
}

/// Regenerated environment view of a section. No rows means the view is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentViewChange {
    pub rows: Vec<EnvironmentRow>,
    /// Names of secret-like rows, redacted again on render
    pub secrets: Vec<String>,
}

impl EnvironmentViewChange {
    pub fn is_removal(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Where a section's changes apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionTarget {
    /// Index into [`Document::sections`](crate::document::Document)
    Existing(usize),
    /// A section proposed at the end of the document
    New { level: usize },
}

/// Changes partitioned to one documentation section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionChanges {
    pub title: String,
    pub target: SectionTarget,
    pub to_add: Vec<EntryAddition>,
    pub to_remove: Vec<EntryRemoval>,
    pub to_update: Vec<EntryUpdate>,
    pub unchanged: usize,
    pub environment_view: Option<EnvironmentViewChange>,
}

impl SectionChanges {
    pub fn existing(index: usize, title: impl Into<String>) -> Self {
        Self::with_target(title, SectionTarget::Existing(index))
    }

    pub fn proposed(title: impl Into<String>, level: usize) -> Self {
        Self::with_target(title, SectionTarget::New { level })
    }

    fn with_target(title: impl Into<String>, target: SectionTarget) -> Self {
        Self {
            title: title.into(),
            target,
            to_add: Vec::new(),
            to_remove: Vec::new(),
            to_update: Vec::new(),
            unchanged: 0,
            environment_view: None,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self.target, SectionTarget::New { .. })
    }

    pub fn has_changes(&self) -> bool {
        !self.to_add.is_empty()
            || !self.to_remove.is_empty()
            || !self.to_update.is_empty()
            || self.environment_view.is_some()
    }

    pub fn is_removed(&self, location: RowRef) -> bool {
        self.to_remove.iter().any(|r| r.location == location)
    }

    pub fn update_at(&self, location: RowRef) -> Option<&EntryUpdate> {
        self.to_update.iter().find(|u| u.location == location)
    }
}

/// The complete reconciliation result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    pub sections: Vec<SectionChanges>,
    /// Undocumented keys that could not be assigned to a single section
    pub unmapped: Vec<AmbiguousMappingError>,
    /// Stale rows kept because they carry the documentation-only marker
    pub intentionally_undocumented: Vec<String>,
    pub unrecognized_tables: Vec<UnrecognizedTableError>,
    /// Environment views left untouched because their end marker is missing
    pub unterminated_views: Vec<UnterminatedViewError>,
    pub warnings: Vec<SecretExposureWarning>,
    /// Environment columns of the generated views
    pub environments: Vec<Environment>,
}

impl ChangeSet {
    /// No document edits are pending.
    ///
    /// Items flagged for human review (unmapped keys, intentionally
    /// undocumented rows, unrecognized tables, unterminated views and
    /// warnings) are not edits.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| !s.has_changes())
    }

    pub fn section(&self, title: &str) -> Option<&SectionChanges> {
        self.sections
            .iter()
            .find(|s| crate::config::titles_match(&s.title, title))
    }

    /// Non-fatal errors flagged for human review, in report order.
    pub fn review_errors(&self) -> Vec<DomainError> {
        let unmapped = self.unmapped.iter().cloned().map(DomainError::from);
        let tables = self.unrecognized_tables.iter().cloned().map(DomainError::from);
        let views = self.unterminated_views.iter().cloned().map(DomainError::from);
        unmapped.chain(tables).chain(views).collect()
    }

    pub fn summary(&self) -> ChangeSummary {
        let count = |f: fn(&SectionChanges) -> usize| -> usize { self.sections.iter().map(f).sum() };
        ChangeSummary {
            added: count(|s| s.to_add.len()),
            removed: count(|s| s.to_remove.len()),
            updated: count(|s| s.to_update.len()),
            unchanged: count(|s| s.unchanged),
            unmapped: self.unmapped.len(),
            intentionally_undocumented: self.intentionally_undocumented.len(),
            unrecognized_tables: self.unrecognized_tables.len(),
            unterminated_views: self.unterminated_views.len(),
            environment_views: count(|s| usize::from(s.environment_view.is_some())),
            new_sections: count(|s| usize::from(s.is_new())),
            warnings: self.warnings.len(),
        }
    }
}

/// Machine-readable counts of a ChangeSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub unmapped: usize,
    pub intentionally_undocumented: usize,
    pub unrecognized_tables: usize,
    pub unterminated_views: usize,
    pub environment_views: usize,
    pub new_sections: usize,
    pub warnings: usize,
}

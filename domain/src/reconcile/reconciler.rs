//! Matching documented rows against classified keys.

use super::change_set::{
    ChangeSet, EntryAddition, EntryRemoval, EntryUpdate, EnvironmentViewChange, Field, FieldDiff,
    RowRef, SectionChanges, required_cell,
};
use crate::classify::{ClassifiedKey, REDACTED_PLACEHOLDER, environments_in_use, secret_exposures};
use crate::config::{
    SectionAssignment, SectionMapping, SyncOptions, UNCATEGORIZED_SECTION, titles_match,
};
use crate::core::error::SecretExposureWarning;
use crate::document::markdown::{environment_view_lines, strip_eol};
use crate::document::{ColumnMap, Document, DocumentedEntry, EnvironmentRow, EnvironmentView};
use crate::source::{Environment, ValueType};
use std::collections::HashMap;
use tracing::{debug, warn};

const DOCUMENTATION_ORIGIN: &str = "documentation";

/// Compute the ChangeSet that brings `document` in line with `keys`.
///
/// Pure and deterministic. Rows are matched by exact name across the whole
/// document; a key's home section is the section of its first documented
/// row, or the section it is proposed for. Undocumented keys are grouped by
/// the prefix mapping, with ambiguous ones reported as unmapped.
pub fn reconcile(
    keys: &[ClassifiedKey],
    document: &Document,
    mapping: &SectionMapping,
    options: &SyncOptions,
) -> ChangeSet {
    let by_name: HashMap<&str, &ClassifiedKey> = keys.iter().map(|k| (k.name(), k)).collect();
    let mut sections: Vec<SectionChanges> = document
        .sections
        .iter()
        .enumerate()
        .map(|(i, s)| SectionChanges::existing(i, s.title()))
        .collect();
    let mut homes: HashMap<&str, usize> = HashMap::new();
    let mut intentionally_undocumented = Vec::new();
    let mut warnings = secret_exposures(keys);

    for (s, section) in document.sections.iter().enumerate() {
        for (b, table) in section.tables() {
            for (r, row) in table.rows.iter().enumerate() {
                let Some(entry) = &row.entry else {
                    continue;
                };
                let location = RowRef {
                    section: s,
                    block: b,
                    row: r,
                };
                match by_name.get(entry.name.as_str()) {
                    Some(key) => {
                        homes.entry(key.name()).or_insert(s);
                        if let Some(warning) = documented_secret(key, entry) {
                            warnings.push(warning);
                        }
                        let diffs = field_diffs(key, entry, &table.columns);
                        if diffs.is_empty() {
                            sections[s].unchanged += 1;
                        } else {
                            sections[s].to_update.push(EntryUpdate {
                                name: entry.name.clone(),
                                location,
                                diffs,
                                secret: key.is_secret_like(),
                            });
                        }
                    }
                    None if options.is_doc_only(&entry.description) => {
                        intentionally_undocumented.push(entry.name.clone());
                    }
                    None => sections[s].to_remove.push(EntryRemoval {
                        name: entry.name.clone(),
                        location,
                    }),
                }
            }
        }
    }

    let mut unmapped = Vec::new();
    let level = document.new_section_level();
    for key in keys {
        if homes.contains_key(key.name()) {
            continue;
        }
        let title = match mapping.assign(key.name()) {
            SectionAssignment::Section(title) => title,
            SectionAssignment::Uncategorized => UNCATEGORIZED_SECTION.to_string(),
            SectionAssignment::Ambiguous(error) => {
                warn!(key = %key.name(), sections = ?error.sections, "ambiguous_section_mapping");
                unmapped.push(error);
                continue;
            }
        };
        let index = match document.find_section(&title) {
            Some(index) => index,
            None => match sections
                .iter()
                .position(|s| s.is_new() && titles_match(&s.title, &title))
            {
                Some(index) => index,
                None => {
                    sections.push(SectionChanges::proposed(title, level));
                    sections.len() - 1
                }
            },
        };
        sections[index].to_add.push(EntryAddition {
            name: key.name().to_string(),
            value_type: key.key.value_type,
            required: key.is_required(),
            example: key.example_value(),
            secret: key.is_secret_like(),
        });
        homes.insert(key.name(), index);
    }

    let environments = environments_in_use(keys);
    for (index, changes) in sections.iter_mut().enumerate() {
        if options.sort_added {
            changes.to_add.sort_by(|a, b| a.name.cmp(&b.name));
        }
        if document
            .unterminated_views
            .iter()
            .any(|view| titles_match(&view.section, &changes.title))
        {
            continue;
        }
        let variant: Vec<&ClassifiedKey> = keys
            .iter()
            .filter(|k| k.environment_variant && homes.get(k.name()) == Some(&index))
            .collect();
        let existing = (index < document.sections.len())
            .then(|| document.sections[index].environment_view())
            .flatten()
            .map(|(_, view)| view);
        changes.environment_view = environment_view_change(existing, &variant, &environments, document);
    }

    let existing_count = document.sections.len();
    sections[existing_count..].sort_by_key(|s| {
        (
            titles_match(&s.title, UNCATEGORIZED_SECTION),
            mapping.position(&s.title).unwrap_or(usize::MAX),
        )
    });
    sections.retain(|s| s.has_changes() || s.unchanged > 0);

    let change_set = ChangeSet {
        sections,
        unmapped,
        intentionally_undocumented,
        unrecognized_tables: document.unrecognized.clone(),
        unterminated_views: document.unterminated_views.clone(),
        warnings,
        environments,
    };
    let summary = change_set.summary();
    debug!(
        added = summary.added,
        removed = summary.removed,
        updated = summary.updated,
        unchanged = summary.unchanged,
        unmapped = summary.unmapped,
        "reconciled"
    );
    change_set
}

/// Field-level differences for the columns the table actually has.
fn field_diffs(key: &ClassifiedKey, entry: &DocumentedEntry, columns: &ColumnMap) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    if columns.value_type.is_some() {
        let documented = entry.documented_type.as_deref().unwrap_or_default();
        let inferred = key.key.value_type;
        let accepted = documented
            .parse::<ValueType>()
            .is_ok_and(|t| inferred.accepts_documented(t));
        if !accepted {
            diffs.push(FieldDiff::new(Field::Type, documented, inferred.as_str()));
        }
    }

    if columns.required.is_some() && entry.required_flag() != Some(key.is_required()) {
        diffs.push(FieldDiff::new(
            Field::Required,
            entry.documented_required.as_deref().unwrap_or_default(),
            required_cell(key.is_required()),
        ));
    }

    if columns.example.is_some() {
        let desired = key.example_value();
        if !desired.is_empty() && entry.example_value != desired {
            diffs.push(FieldDiff::new(Field::Example, &entry.example_value, desired));
        }
    }

    diffs
}

/// A secret-like key whose documented example shows something other than the placeholder.
fn documented_secret(key: &ClassifiedKey, entry: &DocumentedEntry) -> Option<SecretExposureWarning> {
    let example = entry.example_value.as_str();
    (key.is_secret_like() && !example.is_empty() && example != REDACTED_PLACEHOLDER).then(|| {
        SecretExposureWarning {
            key: key.name().to_string(),
            seen_in: vec![DOCUMENTATION_ORIGIN.to_string()],
        }
    })
}

fn environment_view_change(
    existing: Option<&EnvironmentView>,
    variant: &[&ClassifiedKey],
    environments: &[Environment],
    document: &Document,
) -> Option<EnvironmentViewChange> {
    let rows: Vec<EnvironmentRow> = variant
        .iter()
        .map(|k| EnvironmentRow {
            name: k.name().to_string(),
            values: k.environment_values(environments),
        })
        .collect();

    match existing {
        None if rows.is_empty() => return None,
        Some(_) if rows.is_empty() => {
            return Some(EnvironmentViewChange {
                rows,
                secrets: Vec::new(),
            });
        }
        Some(view) => {
            let desired = environment_view_lines(environments, &rows, document.line_ending);
            let current = view.lines.iter().map(|l| strip_eol(l));
            if current.eq(desired.iter().map(|l| strip_eol(l))) {
                return None;
            }
        }
        None => {}
    }

    Some(EnvironmentViewChange {
        rows,
        secrets: variant
            .iter()
            .filter(|k| k.is_secret_like())
            .map(|k| k.name().to_string())
            .collect(),
    })
}

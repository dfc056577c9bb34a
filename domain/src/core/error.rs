//! Domain error types
//!
//! Parse-time failures on configuration sources are fatal ([`MalformedSourceError`]).
//! Problems found while reading documentation or mapping keys are recoverable and
//! only flag content for human review.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A configuration source could not be parsed as key-value pairs.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Malformed source '{source_id}' at line {line}: {reason} (`{content}`)")]
pub struct MalformedSourceError {
    /// Identifier of the offending source
    pub source_id: String,
    /// 1-based line number
    pub line: usize,
    /// The offending line, trimmed
    pub content: String,
    /// Why the line was rejected
    pub reason: String,
}

impl MalformedSourceError {
    pub fn new(
        source_id: impl Into<String>,
        line: usize,
        content: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }
}

/// A documentation table has no recognizable "name" column.
///
/// Non-fatal: the table is preserved verbatim and excluded from reconciliation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Unrecognized table in section '{section}' at line {line}: no name column in `{header}`")]
pub struct UnrecognizedTableError {
    /// Title of the enclosing section (empty for the preamble)
    pub section: String,
    /// 1-based line number of the header row
    pub line: usize,
    /// The header row, trimmed
    pub header: String,
}

/// An environment view begin marker with no end marker before the next
/// heading. The marker line is kept as prose and never rewritten.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Environment view in section '{section}' at line {line} has no end marker; left untouched")]
pub struct UnterminatedViewError {
    /// Title of the enclosing section (empty for the preamble)
    pub section: String,
    /// 1-based line number of the begin marker
    pub line: usize,
}

/// A key matched prefix rules of more than one section with equal specificity.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Key '{key}' matches several sections: {}", sections.join(", "))]
pub struct AmbiguousMappingError {
    pub key: String,
    pub sections: Vec<String>,
}

/// Informational notice that a secret-like key carried a literal value which
/// was redacted instead of rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretExposureWarning {
    /// The secret-like key
    pub key: String,
    /// Where the literal was seen (source ids, or `documentation`)
    pub seen_in: Vec<String>,
}

impl fmt::Display for SecretExposureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Secret-like key '{}' has a literal value in {}; rendered as redacted",
            self.key,
            self.seen_in.join(", ")
        )
    }
}

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    MalformedSource(#[from] MalformedSourceError),

    #[error(transparent)]
    UnrecognizedTable(#[from] UnrecognizedTableError),

    #[error(transparent)]
    UnterminatedView(#[from] UnterminatedViewError),

    #[error(transparent)]
    AmbiguousMapping(#[from] AmbiguousMappingError),
}

impl DomainError {
    /// Fatal errors abort the run; everything else degrades to human review.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::MalformedSource(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_source_display_names_source_and_line() {
        let error = MalformedSourceError::new("application.properties", 7, "oops", "missing '='");
        assert_eq!(
            error.to_string(),
            "Malformed source 'application.properties' at line 7: missing '=' (`oops`)"
        );
    }

    #[test]
    fn test_ambiguous_mapping_lists_sections() {
        let error = AmbiguousMappingError {
            key: "quarkus.otel.enabled".to_string(),
            sections: vec!["Tracing".to_string(), "OpenTelemetry".to_string()],
        };
        assert!(error.to_string().contains("Tracing, OpenTelemetry"));
    }

    #[test]
    fn test_only_malformed_source_is_fatal() {
        let fatal: DomainError = MalformedSourceError::new("s", 1, "x", "y").into();
        assert!(fatal.is_fatal());

        let table: DomainError = UnrecognizedTableError {
            section: "Redis".to_string(),
            line: 3,
            header: "| a | b |".to_string(),
        }
        .into();
        assert!(!table.is_fatal());

        let view: DomainError = UnterminatedViewError {
            section: "Redis".to_string(),
            line: 9,
        }
        .into();
        assert!(!view.is_fatal());
        assert!(view.to_string().contains("line 9"));
    }

    #[test]
    fn test_secret_warning_display() {
        let warning = SecretExposureWarning {
            key: "DB_PASSWORD".to_string(),
            seen_in: vec![".env".to_string()],
        };
        assert_eq!(
            warning.to_string(),
            "Secret-like key 'DB_PASSWORD' has a literal value in .env; rendered as redacted"
        );
    }
}

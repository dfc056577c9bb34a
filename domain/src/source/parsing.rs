//! Line-level parsing of configuration sources.
//!
//! These functions are pure: they turn the raw text of one source into
//! key-value entries, or fail with a [`MalformedSourceError`] naming the
//! offending line. A source is never partially ingested.

use super::entities::{ConfigSource, Environment, SourceFormat};
use crate::core::error::MalformedSourceError;
use regex::Regex;
use std::sync::LazyLock;

static ENV_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

static EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.\-]*)(?::([^}]*))?\}").expect("valid regex")
});

/// One `key=value` entry parsed from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub key: String,
    pub value: String,
    /// 1-based line number where the entry starts
    pub line: usize,
    /// Environment from a `%profile.` prefix, overriding the source tag
    pub profile: Option<Environment>,
}

/// A `${NAME}` or `${NAME:fallback}` reference inside a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub name: String,
    pub fallback: Option<String>,
}

/// Parse a source according to its format.
pub fn parse_source(source: &ConfigSource) -> Result<Vec<SourceEntry>, MalformedSourceError> {
    match source.format {
        SourceFormat::Properties => parse_properties(&source.id, &source.content),
        SourceFormat::EnvTemplate => parse_env_template(&source.id, &source.content),
    }
}

/// Extract every expression reference from a value.
pub fn expressions(value: &str) -> Vec<Expression> {
    EXPRESSION
        .captures_iter(value)
        .map(|caps| Expression {
            name: caps[1].to_string(),
            fallback: caps.get(2).map(|m| m.as_str().to_string()),
        })
        .collect()
}

/// Whether a value contains at least one expression.
pub fn is_expression(value: &str) -> bool {
    EXPRESSION.is_match(value)
}

fn parse_properties(source_id: &str, content: &str) -> Result<Vec<SourceEntry>, MalformedSourceError> {
    let mut entries = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        let (start, logical) = match pending.take() {
            Some((start, mut acc)) => {
                acc.push_str(trimmed);
                (start, acc)
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (line_no, trimmed.to_string())
            }
        };

        // Odd number of trailing backslashes continues the logical line
        let trailing = logical.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            pending = Some((start, logical[..logical.len() - 1].to_string()));
            continue;
        }

        entries.push(parse_property_line(source_id, start, &logical)?);
    }

    if let Some((start, logical)) = pending {
        entries.push(parse_property_line(source_id, start, &logical)?);
    }

    Ok(entries)
}

fn parse_property_line(
    source_id: &str,
    line: usize,
    logical: &str,
) -> Result<SourceEntry, MalformedSourceError> {
    let malformed = |reason: &str| MalformedSourceError::new(source_id, line, logical, reason);

    let Some((raw_key, value)) = logical.split_once('=') else {
        return Err(malformed("missing '=' separator"));
    };

    let mut key = raw_key.trim();
    if key.is_empty() {
        return Err(malformed("empty key"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(malformed("key contains whitespace"));
    }

    let mut profile = None;
    if let Some(rest) = key.strip_prefix('%') {
        let Some((name, stripped)) = rest.split_once('.') else {
            return Err(malformed("profile prefix without key"));
        };
        let Some(env) = Environment::from_profile(name) else {
            return Err(malformed(&format!("unknown profile '%{}'", name)));
        };
        if stripped.is_empty() {
            return Err(malformed("profile prefix without key"));
        }
        profile = Some(env);
        key = stripped;
    }

    Ok(SourceEntry {
        key: key.to_string(),
        value: value.trim().to_string(),
        line,
        profile,
    })
}

fn parse_env_template(source_id: &str, content: &str) -> Result<Vec<SourceEntry>, MalformedSourceError> {
    let mut entries = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let malformed = |reason: &str| MalformedSourceError::new(source_id, line_no, trimmed, reason);

        let body = trimmed
            .strip_prefix("export ")
            .map(str::trim_start)
            .unwrap_or(trimmed);
        let Some((name, value)) = body.split_once('=') else {
            return Err(malformed("missing '=' separator"));
        };
        let name = name.trim();
        if !ENV_NAME.is_match(name) {
            return Err(malformed("invalid variable name"));
        }

        entries.push(SourceEntry {
            key: name.to_string(),
            value: unquote(value.trim()),
            line: line_no,
            profile: None,
        });
    }

    Ok(entries)
}

/// Strip one pair of matching quotes, or an inline ` #` comment from an unquoted value.
fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}

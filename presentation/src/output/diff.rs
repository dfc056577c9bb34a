//! Unified diff of the document before and after rendering

use colored::Colorize;
use similar::TextDiff;

const CONTEXT_RADIUS: usize = 3;

/// Unified diff between `old` and `new`, empty when they are identical.
pub fn unified_diff(old: &str, new: &str, path: &str) -> String {
    if old == new {
        return String::new();
    }
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{}", path), &format!("b/{}", path))
        .to_string()
}

/// Color a unified diff line by line.
pub fn colorize(diff: &str) -> String {
    let mut output = String::with_capacity(diff.len());
    for line in diff.split_inclusive('\n') {
        let (text, eol) = match line.strip_suffix('\n') {
            Some(text) => (text, "\n"),
            None => (line, ""),
        };
        let styled = if text.starts_with("+++") || text.starts_with("---") {
            text.bold().to_string()
        } else if text.starts_with("@@") {
            text.cyan().to_string()
        } else if text.starts_with('+') {
            text.green().to_string()
        } else if text.starts_with('-') {
            text.red().to_string()
        } else {
            text.to_string()
        };
        output.push_str(&styled);
        output.push_str(eol);
    }
    output
}

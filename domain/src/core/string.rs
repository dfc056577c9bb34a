//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Strip one level of inline-code backticks and surrounding whitespace from a
/// Markdown table cell.
pub fn strip_code_span(cell: &str) -> &str {
    let trimmed = cell.trim();
    trimmed
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Wrap a value in inline-code backticks for a Markdown table cell.
///
/// Empty values stay empty. Pipes are escaped so the value cannot split the row.
pub fn code_span(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("`{}`", value.replace('|', "\\|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("日本語テスト", 30), "日本語テスト");
        assert_eq!(truncate("日本語テスト文字列", 15), "日本語テ...");
    }

    #[test]
    fn test_strip_code_span() {
        assert_eq!(strip_code_span(" `REDIS_HOST` "), "REDIS_HOST");
        assert_eq!(strip_code_span("plain"), "plain");
        assert_eq!(strip_code_span("  "), "");
        assert_eq!(strip_code_span("`unterminated"), "`unterminated");
    }

    #[test]
    fn test_code_span() {
        assert_eq!(code_span("localhost"), "`localhost`");
        assert_eq!(code_span(""), "");
        assert_eq!(code_span("a|b"), "`a\\|b`");
    }
}

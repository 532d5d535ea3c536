//! Expression and value text normalization helpers.

use crate::constants::{VALUE_DISPLAY_LIMIT, VALUE_TRUNCATION_MARKER};

/// Trim an expression and drop it when nothing is left.
///
/// # Returns
/// `None` when the input is whitespace-only; otherwise the trimmed expression.
pub fn normalize_expression(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Split dropped or pasted text into one expression per non-blank line.
///
/// # Returns
/// Trimmed expressions in source line order.
pub fn split_expression_lines(text: &str) -> Vec<String> {
    text.lines().filter_map(normalize_expression).collect()
}

/// Cap an evaluation result at [`VALUE_DISPLAY_LIMIT`] characters.
///
/// Longer values keep their first `VALUE_DISPLAY_LIMIT` characters followed by
/// [`VALUE_TRUNCATION_MARKER`]. Applying this twice is a no-op.
pub fn truncate_value(value: String) -> String {
    match value.char_indices().nth(VALUE_DISPLAY_LIMIT) {
        Some((cut, _)) => {
            let mut truncated = value[..cut].to_string();
            truncated.push_str(VALUE_TRUNCATION_MARKER);
            truncated
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_expression_trims_and_drops_blank() {
        assert_eq!(normalize_expression("  a + 1 \t"), Some("a + 1".to_string()));
        assert_eq!(normalize_expression(" \t "), None);
        assert_eq!(normalize_expression(""), None);
    }

    #[test]
    fn split_expression_lines_skips_blank_lines() {
        assert_eq!(
            split_expression_lines("x\n  y \n\n \t\r\nz\r\n"),
            vec!["x", "y", "z"]
        );
        assert!(split_expression_lines("\n\n").is_empty());
    }

    #[test]
    fn truncate_value_caps_long_values_by_chars() {
        let long: String = "\u{00E9}".repeat(VALUE_DISPLAY_LIMIT + 10);
        let truncated = truncate_value(long);
        assert_eq!(truncated.chars().count(), VALUE_DISPLAY_LIMIT + 1);
        assert!(truncated.ends_with(VALUE_TRUNCATION_MARKER));
        assert_eq!(truncate_value(truncated.clone()), truncated);
    }

    #[test]
    fn truncate_value_keeps_values_at_the_limit() {
        let exact = "x".repeat(VALUE_DISPLAY_LIMIT);
        assert_eq!(truncate_value(exact.clone()), exact);
    }
}

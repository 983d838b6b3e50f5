//! CLI output formatting utilities.

use colored::Colorize;
use serde::Serialize;

use crate::error::PixellError;

/// Prints `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PixellError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a bold section title followed by a blank line.
pub fn print_heading(title: &str) {
    println!("{}\n", title.bold());
}

/// Truncates a string to a maximum number of characters, adding an ellipsis.
///
/// Counts characters rather than bytes so multi-byte names stay valid.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 1 {
        return "…".to_string();
    }

    let cut = s.char_indices().nth(max_chars - 1).map_or(s.len(), |(idx, _)| idx);
    format!("{}…", &s[..cut])
}

/// Formats a boolean as a colored check mark.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value { "✓".green().to_string() } else { "✗".red().to_string() }
}

/// Formats an optional value, dimming the placeholder when absent.
#[must_use]
pub fn format_optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".dimmed().to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_name() {
        assert_eq!(truncate("CORAL", 10), "CORAL");
    }

    #[test]
    fn test_truncate_long_name() {
        assert_eq!(truncate("Mountain Lake", 8), "Mountai…");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate("V26", 3), "V26");
    }

    #[test]
    fn test_truncate_single_char_limit() {
        assert_eq!(truncate("Seascape", 1), "…");
    }

    #[test]
    fn test_truncate_multibyte() {
        let s = "Café Nocturne";
        assert_eq!(truncate(s, 5), "Café…");
        assert_eq!(truncate(s, 40), s);
    }

    #[test]
    fn test_format_bool() {
        assert!(format_bool(true).contains('✓'));
        assert!(format_bool(false).contains('✗'));
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(12)), "12");
        assert!(format_optional::<i32>(None).contains('-'));
    }
}

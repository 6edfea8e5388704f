//! Utility functions for date labels, log-safe strings, and secrets.
//!
//! This module provides helper functions used throughout the application:
//! - Date and timestamp labels for the digest subject and bodies
//! - String truncation for logging
//! - Credential redaction so secrets never reach the logs

use chrono::NaiveDateTime;

/// Format the date part used in the subject and body headers (`dd/mm/YYYY`).
pub fn date_label(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Format the full generation timestamp (`dd/mm/YYYY HH:MM:SS`).
pub fn timestamp_label(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at a character boundary at or below `max` bytes and
/// get an ellipsis plus the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Replace a secret with a fixed mask, keeping only whether it is set.
pub fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "********" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(7, 4, 9)
            .unwrap()
    }

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(&at()), "06/05/2025");
    }

    #[test]
    fn test_timestamp_label() {
        assert_eq!(timestamp_label(&at()), "06/05/2025 07:04:09");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // 'é' is two bytes; cutting at 1 would split it.
        assert_eq!(truncate_for_log("éé", 1), "…(+4 bytes)");
    }

    #[test]
    fn test_redact() {
        assert_eq!(redact(""), "<unset>");
        assert_eq!(redact("hunter2"), "********");
    }
}

//! # Utilities Module
//!
//! This module contains helper functions and utilities used
//! across the crate.

use std::time::Duration;

/// Normalize a blockchain address for indexing.
///
/// Addresses are compared case-insensitively, so the index stores them
/// lower-cased and trimmed.
///
/// ## Examples
///
/// ```rust
/// use custody_vault_directory::utils::normalize_address;
/// assert_eq!(normalize_address(" 0xABC "), "0xabc");
/// ```
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Compare two addresses ignoring case and surrounding whitespace.
pub fn addresses_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Parse a `retry-after` hint expressed in milliseconds.
///
/// Returns `None` when the header is absent, empty, or not a whole number,
/// so the caller can fall back to its default wait.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use custody_vault_directory::utils::parse_retry_after_ms;
/// assert_eq!(parse_retry_after_ms(Some("250")), Some(Duration::from_millis(250)));
/// assert_eq!(parse_retry_after_ms(Some("soon")), None);
/// ```
pub fn parse_retry_after_ms(header: Option<&str>) -> Option<Duration> {
    header
        .map(str::trim)
        .and_then(|value| value.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Truncate a string to a maximum length.
///
/// Useful for logging long addresses and response bodies.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let half = max_len.saturating_sub(3) / 2;
        let head: String = s.chars().take(half).collect();
        let tail: String = s
            .chars()
            .rev()
            .take(half)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{}...{}", head, tail)
    }
}

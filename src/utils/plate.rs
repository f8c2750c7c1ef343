//! License plate normalization and matching
//!
//! Plates act as the natural key of the vehicle directory, so every plate that
//! crosses a module boundary goes through [`normalize_plate`] first. Search is
//! a digit-substring match against the plate's digits-only projection, the most
//! defensive of the matching policies the product went through.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum number of digits a search query must carry before the directory is
/// consulted at all.
pub const MIN_QUERY_DIGITS: usize = 2;

/// Canonical plate form: trimmed, uppercased, inner whitespace removed.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Digits-only projection of a plate or query string.
pub fn digits_of(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Parse a free-text search input into a digit query.
///
/// Returns `None` when the input carries fewer than [`MIN_QUERY_DIGITS`]
/// digits; callers must re-prompt without touching the store.
pub fn parse_query(input: &str) -> Option<String> {
    let digits = digits_of(input);
    if digits.len() < MIN_QUERY_DIGITS {
        None
    } else {
        Some(digits)
    }
}

/// Digit-substring match: does the plate's digit projection contain the query?
pub fn matches_query(plate: &str, digit_query: &str) -> bool {
    digits_of(plate).contains(digit_query)
}

/// Loose shape check for a typed plate: letters and digits, 4 to 12 chars.
/// Deliberately not a regional-format validation.
pub fn looks_like_plate(input: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[0-9A-ZА-ЯЁ]{4,12}$").expect("static regex"));
    re.is_match(&normalize_plate(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  a 333 bc "), "A333BC");
        assert_eq!(normalize_plate("б777ху"), "Б777ХУ");
    }

    #[test]
    fn test_digit_substring_match() {
        assert!(matches_query("A333BC", "33"));
        assert!(!matches_query("A123BC", "33"));
        assert!(matches_query("A123BC", "123"));
    }

    #[test]
    fn test_query_minimum_length() {
        assert_eq!(parse_query("3"), None);
        assert_eq!(parse_query("abc"), None);
        assert_eq!(parse_query(" 33 "), Some("33".to_string()));
        // Non-digit characters are projected away before the length check
        assert_eq!(parse_query("a3b3"), Some("33".to_string()));
    }

    #[test]
    fn test_looks_like_plate() {
        assert!(looks_like_plate("B777XY"));
        assert!(looks_like_plate("а333вс"));
        assert!(!looks_like_plate("33"));
        assert!(!looks_like_plate("B 777!"));
    }
}

// Small text predicates shared by the zone tracker, topic extractor and checkers.

use regex::Regex;
use std::sync::LazyLock;

static PAGE_NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}\s*$").unwrap());

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.]+\s*").unwrap());

/// Python's `str.isupper`: at least one cased letter, none of them lowercase
pub fn is_all_caps(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// A table-of-contents line ends with its page number
pub fn ends_with_page_number(text: &str) -> bool {
    PAGE_NUMBER_SUFFIX.is_match(text)
}

/// "1.2. Data sources" → "Data sources"
pub fn strip_numeric_prefix(text: &str) -> &str {
    match NUMERIC_PREFIX.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

pub fn first_alphabetic(text: &str) -> Option<char> {
    text.chars().find(|c| c.is_alphabetic())
}

/// First `count` whitespace-separated tokens, with "..." when more follow
pub fn snippet(text: &str, count: usize) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() > count {
        format!("{}...", tokens[..count].join(" "))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_caps_follows_cased_letters_only() {
        assert!(is_all_caps("INTRODUCTION"));
        assert!(is_all_caps("1. ВСТУП"));
        assert!(!is_all_caps("Introduction"));
        assert!(!is_all_caps("1.2."));
    }

    #[test]
    fn test_page_number_suffix() {
        assert!(ends_with_page_number("INTRODUCTION\t5"));
        assert!(ends_with_page_number("1.1. Background ....... 12 "));
        assert!(!ends_with_page_number("CONCLUSIONS"));
    }

    #[test]
    fn test_strip_numeric_prefix() {
        assert_eq!(strip_numeric_prefix("1.2. data sources"), "data sources");
        assert_eq!(strip_numeric_prefix("3\tResults"), "Results");
        assert_eq!(strip_numeric_prefix("Results"), "Results");
    }

    #[test]
    fn test_snippet_truncates_after_count() {
        assert_eq!(snippet("one two three", 5), "one two three");
        assert_eq!(snippet("a b c d e f g", 5), "a b c d e...");
    }
}

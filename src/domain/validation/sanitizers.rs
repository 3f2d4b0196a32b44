use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::value_objects::ResourceId;

/// Query-operator tokens recognised by document stores
static OPERATOR_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$(where|ne|or|and|regex)").expect("Invalid regex pattern for operator tokens")
});

const STRIPPED_CHARS: &[char] = &['<', '>', '\'', '"', ';', '&', '$', '{', '}', '(', ')', '\0'];

/// Core sanitization functions
pub struct Sanitizer;

impl Sanitizer {
    /// Keep only hex digits and accept the result if it is a full identifier.
    pub fn sanitize_identifier(input: &str) -> Option<ResourceId> {
        let hex: String = input.chars().filter(char::is_ascii_hexdigit).collect();
        if hex.len() != ResourceId::LENGTH {
            return None;
        }
        hex.parse().ok()
    }

    /// Remove operator tokens first, then the character denylist, then trim.
    ///
    /// Once every `$` is gone no operator token can re-form, so applying this
    /// twice yields the same string.
    pub fn sanitize_string(input: &str) -> String {
        let without_operators = OPERATOR_TOKENS.replace_all(input, "");
        without_operators
            .chars()
            .filter(|c| !STRIPPED_CHARS.contains(c))
            .collect::<String>()
            .trim()
            .to_string()
    }

    pub fn encode_html_entities(input: &str) -> String {
        let mut encoded = String::with_capacity(input.len());
        for c in input.chars() {
            match c {
                '&' => encoded.push_str("&amp;"),
                '<' => encoded.push_str("&lt;"),
                '>' => encoded.push_str("&gt;"),
                '"' => encoded.push_str("&quot;"),
                '\'' => encoded.push_str("&#x27;"),
                '/' => encoded.push_str("&#x2F;"),
                other => encoded.push(other),
            }
        }
        encoded
    }

    /// True when sanitizing would not change the value.
    pub fn is_sanitizer_stable(input: &str) -> bool {
        Self::sanitize_string(input) == input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier_accepts_valid() {
        let id = Sanitizer::sanitize_identifier("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_sanitize_identifier_strips_noise() {
        let id = Sanitizer::sanitize_identifier("507f1f77-bcf8-6cd7-9943-9011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");

        let id = Sanitizer::sanitize_identifier("{\"$ne\": \"507F1F77BCF86CD799439011\"}");
        assert!(id.is_none(), "extra hex from the operator must break the length");
    }

    #[test]
    fn test_sanitize_identifier_rejects() {
        for input in ["", "zzzz", "507f1f77bcf86cd79943901", "507f1f77bcf86cd7994390111", "!!!"] {
            assert!(Sanitizer::sanitize_identifier(input).is_none(), "Should reject: {}", input);
        }
    }

    #[test]
    fn test_sanitize_identifier_idempotent() {
        let once = Sanitizer::sanitize_identifier("507F1F77BCF86CD799439011").unwrap();
        let twice = Sanitizer::sanitize_identifier(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sanitize_string_strips_markup() {
        assert_eq!(
            Sanitizer::sanitize_string("<script>alert(1)</script>"),
            "scriptalert1/script"
        );
        assert_eq!(Sanitizer::sanitize_string("  Jane Doe  "), "Jane Doe");
        assert_eq!(Sanitizer::sanitize_string("a\0b"), "ab");
    }

    #[test]
    fn test_sanitize_string_strips_operator_tokens() {
        assert_eq!(Sanitizer::sanitize_string("{\"$where\": \"1\"}"), ": 1");
        assert_eq!(Sanitizer::sanitize_string("x $NE y $Regex z"), "x  y  z");
        assert_eq!(Sanitizer::sanitize_string("$$ne"), "");
    }

    #[test]
    fn test_sanitize_string_idempotent() {
        for input in ["<b>hi</b>", " $or$and ", "Tom & Jerry's (cat)", "$$nee", "plain"] {
            let once = Sanitizer::sanitize_string(input);
            assert_eq!(Sanitizer::sanitize_string(&once), once, "input: {}", input);
        }
    }

    #[test]
    fn test_sanitize_string_keeps_ordinary_text() {
        assert!(Sanitizer::is_sanitizer_stable("Annual checkup, bring x-rays"));
        assert!(!Sanitizer::is_sanitizer_stable("Checkup (annual)"));
    }

    #[test]
    fn test_encode_html_entities() {
        assert_eq!(
            Sanitizer::encode_html_entities("<a href='/x'>Tom & \"Jerry\"</a>"),
            "&lt;a href=&#x27;&#x2F;x&#x27;&gt;Tom &amp; &quot;Jerry&quot;&lt;&#x2F;a&gt;"
        );
    }
}

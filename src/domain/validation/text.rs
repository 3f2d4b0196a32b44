use super::sanitizers::Sanitizer;
use super::threat_rules::ThreatRules;

/// Default limit for general free text
pub const DEFAULT_MAX_LENGTH: usize = 255;
/// Limit for personal and display names
pub const NAME_MAX_LENGTH: usize = 100;

/// Outcome of validating a free-text value.
///
/// `sanitized` is always populated, even when errors were found, so callers
/// can choose between rejecting and storing the cleaned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValidation {
    pub sanitized: String,
    pub errors: Vec<String>,
}

impl TextValidation {
    pub fn check(input: &str, max_length: usize, rules: &ThreatRules) -> Self {
        if input.trim().is_empty() {
            return Self {
                sanitized: String::new(),
                errors: vec!["Input is required".to_string()],
            };
        }

        let mut errors = Vec::new();

        // Characters, not bytes: names are routinely non-ASCII.
        if input.chars().count() > max_length {
            errors.push(format!("Input must be {} characters or less", max_length));
        }

        let threats = rules.detect(input);
        if !threats.is_empty() {
            let messages: Vec<&str> = threats.iter().map(|t| t.message()).collect();
            errors.push(format!("Security threat detected: {}", messages.join(", ")));
        }

        Self {
            sanitized: Sanitizer::sanitize_string(input),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::validate_text;

    #[test]
    fn test_empty_input_is_required() {
        for input in ["", "   "] {
            let result = validate_text(input, DEFAULT_MAX_LENGTH);
            assert!(!result.is_valid());
            assert_eq!(result.errors, vec!["Input is required".to_string()]);
            assert_eq!(result.sanitized, "");
        }
    }

    #[test]
    fn test_valid_text() {
        let result = validate_text("  Jane Doe ", NAME_MAX_LENGTH);
        assert!(result.is_valid());
        assert_eq!(result.sanitized, "Jane Doe");
    }

    #[test]
    fn test_length_counts_characters_without_truncating() {
        let input = "é".repeat(101);
        let result = validate_text(&input, NAME_MAX_LENGTH);
        assert_eq!(
            result.errors,
            vec!["Input must be 100 characters or less".to_string()]
        );
        assert_eq!(result.sanitized.chars().count(), 101);

        assert!(validate_text(&"é".repeat(100), NAME_MAX_LENGTH).is_valid());
    }

    #[test]
    fn test_threats_joined_into_one_error() {
        let result = validate_text("<script>alert(1)</script> onload=x", DEFAULT_MAX_LENGTH);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0],
            "Security threat detected: Script tag detected, Event handler detected"
        );
        assert_eq!(result.sanitized, "scriptalert1/script onload=x");
    }

    #[test]
    fn test_length_and_threat_both_reported() {
        let input = format!("{} DROP", "a".repeat(300));
        let result = validate_text(&input, DEFAULT_MAX_LENGTH);
        assert_eq!(result.errors.len(), 2);
    }
}

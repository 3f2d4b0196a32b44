use once_cell::sync::Lazy;
use std::sync::Arc;

/// Cached default configuration
pub(crate) static DEFAULT_CONFIG: Lazy<Arc<InputSanitizationConfig>> =
    Lazy::new(|| Arc::new(InputSanitizationConfig::default()));

/// Limits applied to the raw request URI before routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSanitizationConfig {
    /// Longest accepted path plus query, in bytes
    pub max_uri_length: usize,
    /// Substrings rejected anywhere in the path (matched case-insensitively)
    pub blocked_path_patterns: Vec<String>,
}

impl Default for InputSanitizationConfig {
    fn default() -> Self {
        Self {
            max_uri_length: 2048,
            blocked_path_patterns: ["../", "..\\", "%2e%2e", "%00", "%0d", "%0a"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl InputSanitizationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_uri_length(mut self, length: usize) -> Self {
        self.max_uri_length = length;
        self
    }

    /// Add a blocked pattern
    pub fn with_blocked_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.blocked_path_patterns
            .push(pattern.into().to_ascii_lowercase());
        self
    }

    pub fn default_cached() -> Arc<Self> {
        Arc::clone(&DEFAULT_CONFIG)
    }
}

//! Input & request guard primitives
//!
//! Pure, allocation-light checks shared by every layer: identifier and text
//! sanitization, rule-based threat detection, and URL/host allowlisting.
//! None of these touch I/O, so they are usable from extractors, use cases
//! and outbound HTTP adapters alike.

mod sanitizers;
mod text;
mod threat_rules;
mod url_guard;

pub use sanitizers::Sanitizer;
pub use text::{TextValidation, DEFAULT_MAX_LENGTH, NAME_MAX_LENGTH};
pub use threat_rules::{ThreatCategory, ThreatRule, ThreatRules};
pub use url_guard::{UrlGuard, UrlRejection};

use crate::domain::value_objects::ResourceId;

/// Normalize an untrusted identifier to a canonical [`ResourceId`], or `None`.
pub fn sanitize_identifier(input: &str) -> Option<ResourceId> {
    Sanitizer::sanitize_identifier(input)
}

/// Strip markup metacharacters and query-operator tokens from free text.
pub fn sanitize_string(input: &str) -> String {
    Sanitizer::sanitize_string(input)
}

/// Escape HTML-significant characters for display. Not a substitute for stripping.
pub fn encode_html_entities(input: &str) -> String {
    Sanitizer::encode_html_entities(input)
}

/// Validate free text against the default threat rules.
pub fn validate_text(input: &str, max_length: usize) -> TextValidation {
    TextValidation::check(input, max_length, ThreatRules::standard())
}

/// Return the canonical URL when it targets an allowed, non-private host.
pub fn validate_url(url: &str, allowed_hosts: &[&str]) -> Option<String> {
    UrlGuard::new(allowed_hosts.iter().copied()).validate(url)
}

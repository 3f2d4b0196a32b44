pub mod auth;
pub mod cors;
pub mod input_sanitization;
pub mod metrics;
pub mod security_headers;
pub mod validation;

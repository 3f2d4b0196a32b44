//! HTTP side of the input guard
//!
//! Path identifiers are cleaned by the [`SanitizedId`] extractor before a
//! handler runs, JSON bodies are decoded by [`JsonBody`] so malformed input is
//! reported like any other validation failure, and the request guard rejects
//! control characters and traversal sequences in the raw URI.

pub mod config;
pub mod extractors;
pub mod middleware;

#[cfg(test)]
mod tests;

pub use config::InputSanitizationConfig;
pub use extractors::{
    AppointmentId, AppointmentIdParam, IdParam, JsonBody, SanitizedId, StaffId, StaffIdParam,
};
pub use middleware::{check_request_uri, request_guard_middleware};

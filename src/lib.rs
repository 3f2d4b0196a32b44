//! # Hospital API
//!
//! Backend for hospital staff and appointment management with an input and
//! request guard in front of every handler.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Entities, value objects and the pure validation core
//!   (identifier and text sanitizers, threat rules, outbound URL guard)
//! - **Application**: Use cases, ports, OAuth/PKCE login and TOTP enrolment
//! - **Infrastructure**: Postgres and in-memory repositories, HTTP identity provider
//! - **API**: Axum handlers, extractors and middleware
//!
//! ## Example Usage
//!
//! ```no_run
//! use hospital_api::domain::validation::{sanitize_identifier, validate_text};
//!
//! let id = sanitize_identifier("507F1F77BCF86CD799439011").unwrap();
//! assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
//!
//! let result = validate_text("<script>alert(1)</script>", 100);
//! assert!(!result.is_valid());
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};

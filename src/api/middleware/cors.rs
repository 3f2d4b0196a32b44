use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// CORS for the single configured frontend origin
///
/// Credentials are allowed so the browser sends the PKCE cookie back on the
/// OAuth callback; that rules out a wildcard origin.
pub fn create_cors_layer(frontend_origin: &str) -> CorsLayer {
    let origin = match frontend_origin.trim_end_matches('/').parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            warn!(frontend_origin, "Invalid frontend origin, CORS will reject all origins");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

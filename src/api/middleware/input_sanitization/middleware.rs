use axum::{
    extract::Request,
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::config::InputSanitizationConfig;
use crate::api::errors::ApiError;

/// Check the raw URI against the configured limits
///
/// Returns the reason for rejection, suitable for logging only.
pub fn check_request_uri(uri: &Uri, config: &InputSanitizationConfig) -> Result<(), String> {
    let raw = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    if raw.len() > config.max_uri_length {
        return Err(format!("URI longer than {} bytes", config.max_uri_length));
    }

    let path = uri.path();
    if path.chars().any(|c| c == '\0' || c == '\r' || c == '\n') {
        return Err("control character in path".to_string());
    }

    let lowered = path.to_ascii_lowercase();
    if let Some(pattern) = config
        .blocked_path_patterns
        .iter()
        .find(|p| lowered.contains(p.as_str()))
    {
        return Err(format!("blocked pattern {:?} in path", pattern));
    }

    Ok(())
}

/// Rejects requests whose URI carries traversal sequences or control bytes
pub async fn request_guard_middleware(request: Request, next: Next) -> Response {
    let config = InputSanitizationConfig::default_cached();

    if let Err(reason) = check_request_uri(request.uri(), &config) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            %reason,
            "Rejected request URI"
        );
        return ApiError::bad_request("Bad Request").into_response();
    }

    next.run(request).await
}

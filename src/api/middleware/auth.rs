use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::application::oauth::{SessionClaims, SessionIssuer};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Requires a valid session token and exposes its [`SessionClaims`] as a
/// request extension.
pub async fn auth_middleware(
    State(sessions): State<Arc<SessionIssuer>>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims: SessionClaims = match bearer_token(request.headers()) {
        Some(token) => match sessions.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                return ApiError::unauthorized().into_response();
            }
        },
        None => return ApiError::unauthorized().into_response(),
    };

    request.extensions_mut().insert(claims);
    next.run(request).await
}

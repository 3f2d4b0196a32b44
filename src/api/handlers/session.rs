use axum::{response::Json, Extension};

use crate::application::oauth::SessionClaims;

/// GET /api/v1/auth/me
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Claims of the current session", body = SessionClaims),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
pub async fn me_handler(Extension(claims): Extension<SessionClaims>) -> Json<SessionClaims> {
    Json(claims)
}

use axum::{extract::State, response::Json, Extension};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::middleware::input_sanitization::JsonBody;
use crate::application::{
    dto::{MessageResponse, MfaSetupResponse, MfaVerifyRequest},
    oauth::SessionClaims,
    use_cases::{DisableMfaUseCase, SetupMfaUseCase, VerifyMfaUseCase},
};
use crate::domain::value_objects::ResourceId;

/// Session subject as a user id; a token we signed always carries one
fn session_user(claims: &SessionClaims) -> Result<ResourceId, ApiError> {
    claims.sub.parse().map_err(|_| ApiError::unauthorized())
}

/// POST /api/v1/auth/mfa/setup
#[utoipa::path(
    post,
    path = "/api/v1/auth/mfa/setup",
    tag = "mfa",
    responses(
        (status = 200, description = "Pending TOTP secret created", body = MfaSetupResponse),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "MFA setup failed")
    ),
    security(("bearer" = []))
)]
pub async fn setup_mfa_handler(
    State(use_case): State<Arc<SetupMfaUseCase>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<MfaSetupResponse>, ApiError> {
    let user_id = session_user(&claims)?;
    let response = use_case
        .execute(&user_id)
        .await
        .map_err(|e| ApiError::mfa(e, "setup"))?;
    Ok(Json(response))
}

/// POST /api/v1/auth/mfa/verify
#[utoipa::path(
    post,
    path = "/api/v1/auth/mfa/verify",
    tag = "mfa",
    request_body = MfaVerifyRequest,
    responses(
        (status = 200, description = "2FA enabled", body = MessageResponse),
        (status = 400, description = "Missing token, no pending setup or invalid token"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
pub async fn verify_mfa_handler(
    State(use_case): State<Arc<VerifyMfaUseCase>>,
    Extension(claims): Extension<SessionClaims>,
    JsonBody(request): JsonBody<MfaVerifyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = session_user(&claims)?;
    use_case
        .execute(&user_id, request.token.as_deref())
        .await
        .map_err(|e| ApiError::mfa(e, "verify"))?;
    Ok(Json(MessageResponse::new("2FA enabled")))
}

/// POST /api/v1/auth/mfa/disable
#[utoipa::path(
    post,
    path = "/api/v1/auth/mfa/disable",
    tag = "mfa",
    responses(
        (status = 200, description = "2FA disabled", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
pub async fn disable_mfa_handler(
    State(use_case): State<Arc<DisableMfaUseCase>>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = session_user(&claims)?;
    use_case
        .execute(&user_id)
        .await
        .map_err(|e| ApiError::mfa(e, "disable"))?;
    Ok(Json(MessageResponse::new("2FA disabled")))
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::middleware::validation::FieldError;
use crate::application::errors::{AppointmentUseCaseError, MfaError};
use crate::application::oauth::OAuthError;
use crate::domain::errors::DomainError;

/// API error response
///
/// Rendered as `{"message": ..., "error"?: ..., "errors"?: [...]}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: Option<String>,
    errors: Option<Vec<FieldError>>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
            errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Not authenticated")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 400 with one entry per offending field
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::bad_request("Validation failed")
        }
    }

    /// Attach the underlying error text as the `error` member
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Map a failure of the login redirect step
    pub fn oauth_init(err: OAuthError) -> Self {
        match err {
            OAuthError::NotConfigured => Self::internal_error(err.to_string()),
            other => {
                warn!(stage = %other.stage(), error = %other, "OAuth init failed");
                Self::internal_error("OAuth init failed").with_detail(other.to_string())
            }
        }
    }

    /// Map a failure of the provider callback step
    pub fn oauth_callback(err: OAuthError) -> Self {
        match err {
            OAuthError::MissingCodeOrVerifier => Self::bad_request(err.to_string()),
            OAuthError::NotConfigured => Self::internal_error(err.to_string()),
            other => {
                warn!(stage = %other.stage(), error = %other, "OAuth callback failed");
                Self::internal_error("OAuth callback failed").with_detail(other.to_string())
            }
        }
    }

    /// Map an MFA failure; `action` names the route, e.g. "setup"
    pub fn mfa(err: MfaError, action: &str) -> Self {
        match err {
            MfaError::MissingToken | MfaError::NoPendingSetup | MfaError::InvalidToken => {
                Self::bad_request(err.to_string())
            }
            MfaError::UserNotFound(_) => Self::not_found("User not found"),
            other => {
                error!(action, error = %other, "MFA operation failed");
                Self::internal_error(format!("MFA {} failed", action)).with_detail(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: &self.message,
            error: self.error.as_deref(),
            errors: self.errors.as_deref(),
        });

        (self.status, body).into_response()
    }
}

impl From<AppointmentUseCaseError> for ApiError {
    fn from(err: AppointmentUseCaseError) -> Self {
        match err {
            AppointmentUseCaseError::NotFound(_) => ApiError::not_found("Appointment not found"),
            AppointmentUseCaseError::Repository(e) => {
                error!(error = %e, "Appointment repository failure");
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ProviderError, RepositoryError};
    use crate::application::oauth::FlowStage;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) =
            body_json(AppointmentUseCaseError::NotFound("x".to_string()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"message": "Appointment not found"}));
    }

    #[tokio::test]
    async fn test_repository_error_is_not_leaked() {
        let err: ApiError =
            AppointmentUseCaseError::Repository(RepositoryError::InvalidData("secret".into()))
                .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let err = ApiError::validation(vec![FieldError {
            field: "patientName".to_string(),
            message: "Patient name contains invalid characters".to_string(),
        }]);
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "patientName");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_oauth_callback_mapping() {
        let (status, body) = body_json(ApiError::oauth_callback(OAuthError::MissingCodeOrVerifier)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing authorization code or PKCE verifier");

        let (status, body) = body_json(ApiError::oauth_callback(OAuthError::NotConfigured)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "OAuth not configured");

        let upstream = OAuthError::Provider {
            stage: FlowStage::AwaitingCallback,
            source: ProviderError::Rejected {
                status: 400,
                body: "invalid_grant".to_string(),
            },
        };
        let (status, body) = body_json(ApiError::oauth_callback(upstream)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "OAuth callback failed");
        assert!(body["error"].as_str().unwrap().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn test_oauth_init_not_configured() {
        let (status, body) = body_json(ApiError::oauth_init(OAuthError::NotConfigured)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"message": "OAuth not configured"}));
    }

    #[tokio::test]
    async fn test_mfa_mapping() {
        let (status, body) = body_json(ApiError::mfa(MfaError::InvalidToken, "verify")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid token");

        let err = MfaError::Repository(RepositoryError::NotFound("u".into()));
        let (status, body) = body_json(ApiError::mfa(err, "setup")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "MFA setup failed");
        assert!(body["error"].is_string());
    }
}

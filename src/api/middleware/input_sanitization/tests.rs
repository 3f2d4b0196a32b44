//! Tests for the HTTP input guard

mod request_guard_tests {
    use super::super::config::InputSanitizationConfig;
    use super::super::middleware::check_request_uri;
    use axum::http::Uri;

    fn check(uri: &str) -> Result<(), String> {
        let uri: Uri = uri.parse().unwrap();
        check_request_uri(&uri, &InputSanitizationConfig::default())
    }

    #[test]
    fn test_plain_paths_pass() {
        assert!(check("/api/v1/appointments").is_ok());
        assert!(check("/api/v1/appointments/507f1f77bcf86cd799439011?x=1").is_ok());
    }

    #[test]
    fn test_traversal_is_rejected() {
        assert!(check("/api/v1/../etc/passwd").is_err());
        assert!(check("/api/v1/%2E%2E/secret").is_err());
        assert!(check("/api/v1/appointments/abc%00").is_err());
    }

    #[test]
    fn test_overlong_uri_is_rejected() {
        let config = InputSanitizationConfig::new().with_max_uri_length(16);
        let uri: Uri = "/api/v1/appointments".parse().unwrap();
        assert!(check_request_uri(&uri, &config).is_err());
    }

    #[test]
    fn test_custom_blocked_pattern() {
        let config = InputSanitizationConfig::new().with_blocked_pattern("/.GIT");
        let uri: Uri = "/static/.git/config".parse().unwrap();
        assert!(check_request_uri(&uri, &config).is_err());
    }
}

mod extractor_tests {
    use super::super::extractors::{AppointmentId, JsonBody, StaffId};
    use crate::application::dto::MfaVerifyRequest;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::IntoResponse,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/appointments/{id}",
                get(|id: AppointmentId| async move { id.id().to_string() }),
            )
            .route(
                "/doctor/{staff_id}",
                get(|id: StaffId| async move { id.into_inner().to_string() }),
            )
            .route(
                "/verify",
                post(|JsonBody(body): JsonBody<MfaVerifyRequest>| async move {
                    body.token.unwrap_or_default().into_response()
                }),
            )
    }

    async fn call(request: Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_id_is_canonicalised() {
        let (status, body) = call(get_req("/appointments/507F1F77BCF86CD799439011")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "507f1f77bcf86cd799439011");
    }

    #[tokio::test]
    async fn test_short_id_is_rejected() {
        let (status, body) = call(get_req("/appointments/123")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid appointment ID format"));
    }

    #[tokio::test]
    async fn test_staff_id_label() {
        let (status, body) = call(get_req("/doctor/not-an-id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid staff ID format"));
    }

    #[tokio::test]
    async fn test_operator_noise_is_stripped_from_id() {
        let (status, body) =
            call(get_req("/appointments/%24ne507f1f77bcf86cd799439011")).await;
        // "$ne" leaves an extra "e", so the sanitized id is 25 characters long
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid appointment ID format"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_validation_failure() {
        let request = Request::builder()
            .method("POST")
            .uri("/verify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn test_wrongly_typed_field_is_named() {
        let request = Request::builder()
            .method("POST")
            .uri("/verify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"token":123456}"#))
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "token");
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_body_passes_through() {
        let request = Request::builder()
            .method("POST")
            .uri("/verify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"token":"123456"}"#))
            .unwrap();
        let (status, body) = call(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "123456");
    }
}

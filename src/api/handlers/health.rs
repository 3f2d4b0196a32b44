use axum::{extract::State, http::StatusCode, response::Json};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

use super::health_checks::{check_database, DatabaseStatus};

const SERVICE_NAME: &str = "hospital_api";

/// Basic health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Database readiness response
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub service: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health
/// Liveness probe (no database check)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}

/// GET /health/ready
/// Readiness probe with database connectivity check
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_handler(
    State(pool): State<Option<Arc<PgPool>>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let db = check_database(pool.as_deref(), Duration::from_secs(2)).await;

    let status = if db.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let (latency_ms, error) = match &db {
        DatabaseStatus::Connected { latency_ms } => {
            (Some(u64::try_from(*latency_ms).unwrap_or(u64::MAX)), None)
        }
        DatabaseStatus::Unavailable(e) => (None, Some(e.clone())),
        DatabaseStatus::TimedOut => (
            None,
            Some("Database query timed out after 2 seconds".to_string()),
        ),
        DatabaseStatus::InMemory => (None, None),
    };

    (
        status,
        Json(ReadinessResponse {
            status: if db.is_ready() { "ready" } else { "not_ready" }.to_string(),
            service: SERVICE_NAME.to_string(),
            database: db.label().to_string(),
            latency_ms,
            error,
        }),
    )
}

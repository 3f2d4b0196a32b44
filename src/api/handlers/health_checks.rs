//! Checks behind the readiness probe

use std::time::{Duration, Instant};

use sqlx::PgPool;

/// Outcome of the database probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    Connected { latency_ms: u128 },
    /// No database configured; repositories live in memory
    InMemory,
    Unavailable(String),
    TimedOut,
}

impl DatabaseStatus {
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            DatabaseStatus::Connected { .. } | DatabaseStatus::InMemory
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatabaseStatus::Connected { .. } => "connected",
            DatabaseStatus::InMemory => "in_memory",
            DatabaseStatus::Unavailable(_) => "disconnected",
            DatabaseStatus::TimedOut => "timeout",
        }
    }
}

/// Sanitize database error messages to prevent information leakage
pub fn sanitize_db_error(error: &sqlx::Error) -> String {
    match error {
        sqlx::Error::Configuration(_) => "Database configuration error",
        sqlx::Error::Database(_) => "Database operation error",
        sqlx::Error::Io(_) => "Database connection error",
        sqlx::Error::Tls(_) => "Database TLS error",
        sqlx::Error::Protocol(_) => "Database protocol error",
        sqlx::Error::PoolTimedOut => "Database timeout",
        sqlx::Error::PoolClosed => "Database connection closed",
        _ => "Database error",
    }
    .to_string()
}

/// Run `SELECT 1` against the pool, bounded by `timeout`
pub async fn check_database(pool: Option<&PgPool>, timeout: Duration) -> DatabaseStatus {
    let Some(pool) = pool else {
        return DatabaseStatus::InMemory;
    };

    let start = Instant::now();
    match tokio::time::timeout(timeout, sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool))
        .await
    {
        Ok(Ok(_)) => DatabaseStatus::Connected {
            latency_ms: start.elapsed().as_millis(),
        },
        Ok(Err(e)) => DatabaseStatus::Unavailable(sanitize_db_error(&e)),
        Err(_) => DatabaseStatus::TimedOut,
    }
}

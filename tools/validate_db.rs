//! Audit appointment rows for values the API would never have written.
//!
//! Reports invalid statuses, malformed staff ids and staff references that
//! point at no staff row. `--fix` resets invalid statuses to `Active`; the
//! other findings need a human decision and are only reported.

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;
use std::env;
use tracing::{info, warn};

use hospital_api::value_objects::{AppointmentStatus, ResourceId};

#[derive(Parser)]
#[command(name = "validate_db")]
#[command(about = "Check the appointments table for invalid data", long_about = None)]
struct Cli {
    /// Postgres connection string (defaults to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Reset invalid statuses to Active
    #[arg(long)]
    fix: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    let db_url = cli
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .context("DATABASE_URL must be set or passed with --database-url")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    let valid_statuses: Vec<&str> = AppointmentStatus::ALL.iter().map(|s| s.as_str()).collect();

    // Appointments with invalid status
    let invalid_status_rows =
        sqlx::query("SELECT id, status FROM appointments WHERE NOT (status = ANY($1))")
            .bind(&valid_statuses)
            .fetch_all(&pool)
            .await?;

    println!("Invalid status rows: {}", invalid_status_rows.len());
    for r in invalid_status_rows.iter() {
        let id: String = r.get("id");
        let status: String = r.get("status");
        println!("id: {}, status: {}", id, status);
        if cli.fix {
            sqlx::query("UPDATE appointments SET status = $1, updated_at = NOW() WHERE id = $2")
                .bind(AppointmentStatus::Active.as_str())
                .bind(&id)
                .execute(&pool)
                .await?;
            info!("Fixed: {} -> {}", id, AppointmentStatus::Active);
        }
    }

    // Staff ids that are not canonical 24-character hex
    let staff_id_rows = sqlx::query("SELECT id, staff_id FROM appointments")
        .fetch_all(&pool)
        .await?;

    let malformed: Vec<(String, String)> = staff_id_rows
        .iter()
        .map(|r| (r.get::<String, _>("id"), r.get::<String, _>("staff_id")))
        .filter(|(_, staff_id)| {
            !ResourceId::is_valid(staff_id) || staff_id.to_ascii_lowercase() != *staff_id
        })
        .collect();

    println!("Malformed staff_id rows: {}", malformed.len());
    for (id, staff_id) in malformed.iter() {
        println!("id: {}, staff_id: {:?}", id, staff_id);
    }

    // Staff references with no matching staff row
    let dangling_rows = sqlx::query(
        r#"SELECT a.id, a.staff_id FROM appointments a
           LEFT JOIN staff s ON s.id = a.staff_id
           WHERE s.id IS NULL"#,
    )
    .fetch_all(&pool)
    .await?;

    println!("Dangling staff references: {}", dangling_rows.len());
    for r in dangling_rows.iter() {
        let id: String = r.get("id");
        let staff_id: String = r.get("staff_id");
        println!("id: {}, staff_id: {}", id, staff_id);
    }

    if !cli.fix && !invalid_status_rows.is_empty() {
        warn!("Re-run with --fix to reset invalid statuses");
    }

    Ok(())
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::warn;

use crate::application::ports::{AppointmentRepository, RepositoryError};
use crate::domain::entities::{Appointment, AppointmentDbData, AppointmentDetails};
use crate::domain::value_objects::{AppointmentDate, ResourceId};

const APPOINTMENT_SELECT: &str = r#"
    SELECT id, patient_name, staff_id, appointment_date, appointment_time,
           reason, status, created_at, updated_at
    FROM appointments
"#;

/// PostgreSQL implementation of the appointment repository
pub struct PostgresAppointmentRepository {
    pool: PgPool,
}

impl PostgresAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn create(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, patient_name, staff_id, appointment_date, appointment_time,
                reason, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(appointment.id().as_str())
        .bind(appointment.patient_name())
        .bind(appointment.staff_id().as_str())
        .bind(appointment.date().as_naive())
        .bind(appointment.time().to_string())
        .bind(appointment.reason())
        .bind(appointment.status().as_str())
        .bind(appointment.created_at())
        .bind(appointment.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, appointment.id().as_str()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Appointment>, RepositoryError> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{} WHERE id = $1",
            APPOINTMENT_SELECT
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AppointmentRow::into_domain).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{} ORDER BY created_at DESC",
            APPOINTMENT_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(valid_appointments(rows))
    }

    async fn list_by_staff(
        &self,
        staff_id: &ResourceId,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "{} WHERE staff_id = $1 ORDER BY appointment_date, appointment_time",
            APPOINTMENT_SELECT
        ))
        .bind(staff_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(valid_appointments(rows))
    }

    async fn update(&self, appointment: &Appointment) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET patient_name = $2, staff_id = $3, appointment_date = $4,
                appointment_time = $5, reason = $6, status = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(appointment.id().as_str())
        .bind(appointment.patient_name())
        .bind(appointment.staff_id().as_str())
        .bind(appointment.date().as_naive())
        .bind(appointment.time().to_string())
        .bind(appointment.reason())
        .bind(appointment.status().as_str())
        .bind(appointment.updated_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(appointment.id().to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &ResourceId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Rows that fail domain checks (legacy imports, see `validate_db`) are
/// logged and left out of listings instead of failing the whole request.
fn valid_appointments(rows: Vec<AppointmentRow>) -> Vec<Appointment> {
    rows.into_iter()
        .filter_map(|row| match row.into_domain() {
            Ok(appointment) => Some(appointment),
            Err(e) => {
                warn!(error = %e, "Skipping invalid appointment row");
                None
            }
        })
        .collect()
}

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: String,
    patient_name: String,
    staff_id: String,
    appointment_date: NaiveDate,
    appointment_time: String,
    reason: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_domain(self) -> Result<Appointment, RepositoryError> {
        let invalid = |e: crate::domain::errors::DomainError| {
            RepositoryError::InvalidData(format!("appointment {}: {}", self.id, e))
        };

        let details = AppointmentDetails {
            patient_name: self.patient_name,
            staff_id: self.staff_id.parse().map_err(invalid)?,
            date: AppointmentDate::from_naive(self.appointment_date),
            time: self.appointment_time.parse().map_err(invalid)?,
            reason: self.reason,
            status: self.status.parse().map_err(invalid)?,
        };

        Ok(Appointment::from_db(AppointmentDbData {
            id: self.id.parse().map_err(invalid)?,
            details,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

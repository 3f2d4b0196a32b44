use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::application::ports::{RepositoryError, StaffRepository};
use crate::domain::entities::{Staff, StaffDbData};
use crate::domain::value_objects::{ResourceId, Role};

const STAFF_SELECT: &str = r#"
    SELECT id, name, email, password, role, created_at
    FROM staff
"#;

/// PostgreSQL implementation of the staff repository
pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Staff>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(&format!("{} WHERE id = $1", STAFF_SELECT))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(StaffRow::into_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(&format!("{} WHERE email = $1", STAFF_SELECT))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(StaffRow::into_domain).transpose()
    }

    async fn create(&self, staff: &Staff) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, name, email, password, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(staff.id().as_str())
        .bind(staff.name())
        .bind(staff.email())
        .bind(staff.password())
        .bind(staff.role().as_str())
        .bind(staff.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, staff.email()))?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct StaffRow {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl StaffRow {
    fn into_domain(self) -> Result<Staff, RepositoryError> {
        let id = self
            .id
            .parse::<ResourceId>()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        Ok(Staff::from_db(StaffDbData {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            role,
            created_at: self.created_at,
        }))
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::entities::{User, UserDbData};
use crate::domain::value_objects::ResourceId;

const USER_SELECT: &str = r#"
    SELECT id, username, email, password, two_factor_secret, two_factor_enabled, created_at
    FROM users
"#;

/// PostgreSQL implementation of the user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE id = $1", USER_SELECT))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE email = $1", USER_SELECT))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_domain).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password, two_factor_secret, two_factor_enabled, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password())
        .bind(user.two_factor_secret())
        .bind(user.two_factor_enabled())
        .bind(user.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, user.email()))?;

        Ok(())
    }

    async fn update_two_factor(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET two_factor_secret = $2, two_factor_enabled = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.two_factor_secret())
        .bind(user.two_factor_enabled())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(user.id().to_string()));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password: String,
    two_factor_secret: Option<String>,
    two_factor_enabled: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_domain(self) -> Result<User, RepositoryError> {
        let id = self
            .id
            .parse::<ResourceId>()
            .map_err(|e| RepositoryError::InvalidData(e.to_string()))?;

        Ok(User::from_db(UserDbData {
            id,
            username: self.username,
            email: self.email,
            password: self.password,
            two_factor_secret: self.two_factor_secret,
            two_factor_enabled: self.two_factor_enabled,
            created_at: self.created_at,
        }))
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Unique constraint hit, e.g. a second account for the same email
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored data is invalid: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into [`RepositoryError::AlreadyExists`].
    pub fn from_insert(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::AlreadyExists(what.to_string())
            }
            _ => RepositoryError::Database(err),
        }
    }
}

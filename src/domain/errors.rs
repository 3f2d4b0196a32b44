use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid resource identifier: {0}")]
    InvalidResourceId(String),

    #[error("Invalid appointment status: {0}")]
    InvalidAppointmentStatus(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

//! Error types shared by the application use cases

use thiserror::Error;

use crate::application::ports::RepositoryError;
use crate::application::totp::TotpError;

/// Error type for appointment use cases
#[derive(Debug, Error)]
pub enum AppointmentUseCaseError {
    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Error type for two-factor enrolment use cases
#[derive(Debug, Error)]
pub enum MfaError {
    #[error("Missing token")]
    MissingToken,

    #[error("No pending 2FA setup")]
    NoPendingSetup,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("TOTP error: {0}")]
    Totp(#[from] TotpError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

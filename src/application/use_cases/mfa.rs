use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::{
    dto::MfaSetupResponse,
    errors::MfaError,
    ports::UserRepository,
    totp,
};
use crate::domain::{entities::User, value_objects::ResourceId};

async fn load_user(
    repository: &Arc<dyn UserRepository>,
    user_id: &ResourceId,
) -> Result<User, MfaError> {
    repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| MfaError::UserNotFound(user_id.to_string()))
}

/// Use case for starting TOTP enrolment
pub struct SetupMfaUseCase {
    repository: Arc<dyn UserRepository>,
    issuer: String,
}

impl SetupMfaUseCase {
    pub fn new(repository: Arc<dyn UserRepository>, issuer: String) -> Self {
        Self { repository, issuer }
    }

    /// Store a pending secret and return its provisioning URI and QR code.
    /// 2FA stays disabled until a code is verified.
    pub async fn execute(&self, user_id: &ResourceId) -> Result<MfaSetupResponse, MfaError> {
        let mut user = load_user(&self.repository, user_id).await?;

        let secret = totp::generate_secret();
        let otpauth = totp::otpauth_uri(&self.issuer, user.email(), &secret);
        let qr = totp::qr_data_url(&otpauth)?;

        user.begin_two_factor_setup(secret);
        self.repository.update_two_factor(&user).await?;

        info!(user_id = %user_id, "2FA setup started");
        Ok(MfaSetupResponse { otpauth, qr })
    }
}

/// Use case for confirming enrolment with a first code
pub struct VerifyMfaUseCase {
    repository: Arc<dyn UserRepository>,
}

impl VerifyMfaUseCase {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, user_id: &ResourceId, token: Option<&str>) -> Result<(), MfaError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(MfaError::MissingToken)?;

        let mut user = load_user(&self.repository, user_id).await?;
        let secret = user.two_factor_secret().ok_or(MfaError::NoPendingSetup)?;

        let now = Utc::now().timestamp().max(0) as u64;
        if !totp::verify(secret, token, now)? {
            warn!(user_id = %user_id, "2FA verification failed");
            return Err(MfaError::InvalidToken);
        }

        user.enable_two_factor();
        self.repository.update_two_factor(&user).await?;

        info!(user_id = %user_id, "2FA enabled");
        Ok(())
    }
}

/// Use case for turning 2FA off and discarding the secret
pub struct DisableMfaUseCase {
    repository: Arc<dyn UserRepository>,
}

impl DisableMfaUseCase {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, user_id: &ResourceId) -> Result<(), MfaError> {
        let mut user = load_user(&self.repository, user_id).await?;
        user.disable_two_factor();
        self.repository.update_two_factor(&user).await?;

        info!(user_id = %user_id, "2FA disabled");
        Ok(())
    }
}

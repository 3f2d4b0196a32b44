use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::pkce::{generate_state, PkcePair};
use super::session::{SessionError, SessionIssuer};
use crate::application::ports::{
    IdentityProvider, ProviderError, RepositoryError, StaffRepository, UserRepository,
};
use crate::domain::entities::{Staff, User};
use crate::domain::validation::{validate_text, NAME_MAX_LENGTH};
use crate::domain::value_objects::Role;

/// Provider-independent OAuth client settings
#[derive(Debug, Clone, Default)]
pub struct OAuthSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: String,
    pub authorization_endpoint: String,
}

impl OAuthSettings {
    /// Client id and redirect URI, when both are present and non-empty
    fn client(&self) -> Option<(&str, &str)> {
        let client_id = self.client_id.as_deref().filter(|v| !v.is_empty())?;
        let redirect_uri = self.redirect_uri.as_deref().filter(|v| !v.is_empty())?;
        Some((client_id, redirect_uri))
    }

    pub fn is_configured(&self) -> bool {
        self.client().is_some()
    }
}

/// Progress of a single login attempt, used to tag failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Idle,
    AwaitingCallback,
    TokenExchanged,
    IdentityResolved,
    SessionEstablished,
}

impl std::fmt::Display for FlowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowStage::Idle => "idle",
            FlowStage::AwaitingCallback => "awaiting_callback",
            FlowStage::TokenExchanged => "token_exchanged",
            FlowStage::IdentityResolved => "identity_resolved",
            FlowStage::SessionEstablished => "session_established",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth not configured")]
    NotConfigured,

    #[error("Missing authorization code or PKCE verifier")]
    MissingCodeOrVerifier,

    #[error("Invalid authorization endpoint: {0}")]
    InvalidAuthorizationEndpoint(String),

    #[error("{source}")]
    Provider {
        stage: FlowStage,
        #[source]
        source: ProviderError,
    },

    #[error("Identity provider did not return an email address")]
    MissingEmail,

    #[error("{0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Session(#[from] SessionError),
}

impl OAuthError {
    /// Last stage reached before the failure
    pub fn stage(&self) -> FlowStage {
        match self {
            OAuthError::NotConfigured | OAuthError::InvalidAuthorizationEndpoint(_) => {
                FlowStage::Idle
            }
            OAuthError::MissingCodeOrVerifier => FlowStage::AwaitingCallback,
            OAuthError::Provider { stage, .. } => *stage,
            OAuthError::MissingEmail | OAuthError::Repository(_) => FlowStage::TokenExchanged,
            OAuthError::Session(_) => FlowStage::IdentityResolved,
        }
    }
}

/// Everything the caller needs to send the browser to the provider
#[derive(Debug, Clone)]
pub struct LoginStart {
    pub authorization_url: String,
    /// Must be stored client-side (HttpOnly cookie) until the callback
    pub pkce_verifier: String,
    pub state: String,
}

/// Result of a successful callback
#[derive(Debug, Clone)]
pub struct EstablishedSession {
    pub token: String,
    pub user: User,
    pub staff: Staff,
}

impl EstablishedSession {
    pub fn role(&self) -> Role {
        self.staff.role()
    }

    /// Frontend landing URL; the session travels in the fragment so it never
    /// reaches a server log or a `Referer` header.
    pub fn frontend_redirect(&self, frontend_origin: &str) -> String {
        let user = serde_json::json!({
            "username": self.user.username(),
            "email": self.user.email(),
            "role": self.role(),
        });

        format!(
            "{}/oauth/callback#token={}&role={}&user={}",
            frontend_origin.trim_end_matches('/'),
            urlencoding::encode(&self.token),
            urlencoding::encode(self.role().as_str()),
            urlencoding::encode(&user.to_string()),
        )
    }
}

pub struct OAuthFlow {
    settings: OAuthSettings,
    provider: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserRepository>,
    staff: Arc<dyn StaffRepository>,
    sessions: SessionIssuer,
}

impl OAuthFlow {
    pub fn new(
        settings: OAuthSettings,
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserRepository>,
        staff: Arc<dyn StaffRepository>,
        sessions: SessionIssuer,
    ) -> Self {
        Self {
            settings,
            provider,
            users,
            staff,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionIssuer {
        &self.sessions
    }

    /// IDLE → AWAITING_CALLBACK
    pub fn begin(&self) -> Result<LoginStart, OAuthError> {
        let (client_id, redirect_uri) = self.settings.client().ok_or(OAuthError::NotConfigured)?;

        let pkce = PkcePair::generate();
        let state = generate_state();

        let authorization_url = Url::parse_with_params(
            &self.settings.authorization_endpoint,
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", self.settings.scope.as_str()),
                ("code_challenge", pkce.challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| OAuthError::InvalidAuthorizationEndpoint(e.to_string()))?;

        info!(stage = %FlowStage::AwaitingCallback, "OAuth login started");

        Ok(LoginStart {
            authorization_url: authorization_url.into(),
            pkce_verifier: pkce.verifier,
            state,
        })
    }

    /// AWAITING_CALLBACK → TOKEN_EXCHANGED → IDENTITY_RESOLVED → SESSION_ESTABLISHED
    ///
    /// Input presence is checked before configuration so a stray callback
    /// gets a 400 even on an unconfigured deployment.
    pub async fn complete(
        &self,
        code: Option<&str>,
        verifier: Option<&str>,
    ) -> Result<EstablishedSession, OAuthError> {
        let (code, verifier) = match (
            code.filter(|c| !c.is_empty()),
            verifier.filter(|v| !v.is_empty()),
        ) {
            (Some(code), Some(verifier)) => (code, verifier),
            _ => return Err(OAuthError::MissingCodeOrVerifier),
        };

        if !self.settings.is_configured() {
            return Err(OAuthError::NotConfigured);
        }

        let tokens = self
            .provider
            .exchange_code(code, verifier)
            .await
            .map_err(|source| OAuthError::Provider {
                stage: FlowStage::AwaitingCallback,
                source,
            })?;

        let profile = self
            .provider
            .fetch_user_info(&tokens.access_token)
            .await
            .map_err(|source| OAuthError::Provider {
                stage: FlowStage::TokenExchanged,
                source,
            })?;

        let email = profile
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(OAuthError::MissingEmail)?
            .to_string();

        let display_name = self.display_name(profile.name.as_deref(), &email);

        let user = self.resolve_user(&email).await?;
        let staff = self.resolve_staff(&email, display_name).await?;

        let token = self.sessions.issue(&user, &staff)?;

        info!(
            stage = %FlowStage::SessionEstablished,
            user_id = %user.id(),
            role = %staff.role(),
            "OAuth login completed"
        );

        Ok(EstablishedSession { token, user, staff })
    }

    /// Provider display names are untrusted; keep the cleaned form.
    fn display_name(&self, name: Option<&str>, email: &str) -> String {
        let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
            return email.to_string();
        };

        let checked = validate_text(name, NAME_MAX_LENGTH);
        if !checked.is_valid() {
            warn!(errors = ?checked.errors, "Provider display name failed validation, storing sanitized form");
        }

        if checked.sanitized.is_empty() {
            email.to_string()
        } else {
            checked.sanitized
        }
    }

    async fn resolve_user(&self, email: &str) -> Result<User, OAuthError> {
        if let Some(user) = self.users.find_by_email(email).await? {
            return Ok(user);
        }

        let user = User::from_external_login(email.to_string());
        match self.users.create(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), "Created user from external login");
                Ok(user)
            }
            // Lost a race with a concurrent first login for the same email.
            Err(RepositoryError::AlreadyExists(_)) => self
                .users
                .find_by_email(email)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(format!("user {}", email)).into()),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_staff(&self, email: &str, name: String) -> Result<Staff, OAuthError> {
        if let Some(staff) = self.staff.find_by_email(email).await? {
            return Ok(staff);
        }

        let staff = Staff::from_external_login(name, email.to_string());
        match self.staff.create(&staff).await {
            Ok(()) => {
                info!(staff_id = %staff.id(), role = %staff.role(), "Created staff record from external login");
                Ok(staff)
            }
            Err(RepositoryError::AlreadyExists(_)) => self
                .staff
                .find_by_email(email)
                .await?
                .ok_or_else(|| RepositoryError::NotFound(format!("staff {}", email)).into()),
            Err(e) => Err(e.into()),
        }
    }
}

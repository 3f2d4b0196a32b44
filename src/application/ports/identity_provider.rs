use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Tokens returned by the provider's token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTokens {
    pub access_token: String,
    pub id_token: Option<String>,
}

/// Profile fields read from the provider's user-info endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderUserInfo {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request to identity provider failed: {0}")]
    Transport(String),

    #[error("Identity provider responded with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid response from identity provider: {0}")]
    InvalidResponse(String),

    #[error("Outbound URL rejected: {0}")]
    UrlRejected(String),
}

/// Port for the external OAuth 2.0 / OpenID Connect provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code plus PKCE verifier for tokens
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<ProviderTokens, ProviderError>;

    async fn fetch_user_info(&self, access_token: &str) -> Result<ProviderUserInfo, ProviderError>;
}

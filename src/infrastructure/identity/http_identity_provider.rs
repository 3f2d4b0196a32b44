use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::SecureHttpClient;
use crate::application::ports::{
    IdentityProvider, ProviderError, ProviderTokens, ProviderUserInfo,
};
use crate::config::Config;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// OpenID Connect provider reached over HTTPS (Google by default)
pub struct HttpIdentityProvider {
    http: SecureHttpClient,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl HttpIdentityProvider {
    pub fn new(
        http: SecureHttpClient,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        token_url: String,
        userinfo_url: String,
    ) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            redirect_uri,
            token_url,
            userinfo_url,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let http = SecureHttpClient::new(
            config.outbound_guard(),
            Duration::from_secs(config.oidc.request_timeout_secs),
        )?;

        Ok(Self::new(
            http,
            config.oidc.client_id.clone().unwrap_or_default(),
            config.oidc.client_secret.clone().unwrap_or_default(),
            config.oidc.redirect_uri.clone().unwrap_or_default(),
            config.oidc.token_url.clone(),
            config.oidc.userinfo_url.clone(),
        ))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<ProviderTokens, ProviderError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response: TokenResponse = self.http.post_form(&self.token_url, &form).await?;
        info!(
            has_id_token = response.id_token.is_some(),
            "Authorization code exchanged"
        );

        Ok(ProviderTokens {
            access_token: response.access_token,
            id_token: response.id_token,
        })
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<ProviderUserInfo, ProviderError> {
        let response: UserInfoResponse = self.http.get_json(&self.userinfo_url, access_token).await?;

        Ok(ProviderUserInfo {
            email: response.email.filter(|e| !e.trim().is_empty()),
            name: response.name,
        })
    }
}

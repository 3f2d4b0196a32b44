use std::time::Duration;

use reqwest::{redirect, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::application::ports::ProviderError;
use crate::domain::validation::UrlGuard;

/// Outbound HTTP client that refuses to talk to anything its [`UrlGuard`] rejects.
///
/// Redirects are never followed: a 3xx from an allowed host could otherwise
/// bounce the request to an internal address.
pub struct SecureHttpClient {
    client: reqwest::Client,
    guard: UrlGuard,
}

impl SecureHttpClient {
    pub fn new(guard: UrlGuard, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .user_agent(concat!("hospital-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(Self { client, guard })
    }

    pub fn guard(&self) -> &UrlGuard {
        &self.guard
    }

    fn checked_url(&self, raw: &str) -> Result<Url, ProviderError> {
        self.guard.check(raw).map_err(|reason| {
            warn!(%reason, "Blocked outbound request");
            ProviderError::UrlRejected(reason.to_string())
        })
    }

    /// POST an `application/x-www-form-urlencoded` body and decode a JSON reply
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        raw_url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = self.checked_url(raw_url)?;
        debug!(host = url.host_str().unwrap_or_default(), "POST form");

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Self::read_json(response).await
    }

    /// GET a JSON document with a bearer token
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        raw_url: &str,
        bearer: &str,
    ) -> Result<T, ProviderError> {
        let url = self.checked_url(raw_url)?;
        debug!(host = url.host_str().unwrap_or_default(), "GET json");

        let response = self
            .client
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SecureHttpClient {
        let guard = UrlGuard::new(["oauth2.googleapis.com"]).with_allowed_ports([443]);
        SecureHttpClient::new(guard, Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_metadata_endpoint_without_sending() {
        let err = client()
            .get_json::<serde_json::Value>("http://169.254.169.254/latest/meta-data", "t")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UrlRejected(_)));
    }

    #[tokio::test]
    async fn test_rejects_host_outside_allowlist() {
        let err = client()
            .post_form::<serde_json::Value>("https://evil.example/token", &[("a", "b")])
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UrlRejected(_)));
    }

    #[tokio::test]
    async fn test_rejects_port_outside_allowlist() {
        let err = client()
            .post_form::<serde_json::Value>("https://oauth2.googleapis.com:8443/token", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UrlRejected(_)));
    }

    #[test]
    fn test_exposes_guard() {
        assert_eq!(client().guard().allowed_hosts(), ["oauth2.googleapis.com"]);
    }
}

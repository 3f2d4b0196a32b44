use std::str::FromStr;

use url::Url;

use crate::application::oauth::OAuthSettings;
use crate::domain::validation::UrlGuard;

/// Fallback signing secret for local development; rejected in production.
pub const DEV_JWT_SECRET: &str = "JWT_SECRET";
const MIN_PRODUCTION_SECRET_BYTES: usize = 32;
/// One year; larger values overflow session expiry arithmetic
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// External identity provider (OpenID Connect) settings
#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Unset means in-memory repositories (development only)
    pub database_url: Option<String>,
    // Database connection pool settings
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub db_max_lifetime_secs: u64,
    pub environment: Environment,
    pub frontend_origin: String,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub oidc: OidcConfig,
    pub mfa_issuer: String,
    /// Hosts client-facing URLs (the post-login redirect) may point at
    pub allowed_hosts: Vec<String>,
    /// Hosts and ports outbound HTTP calls may reach
    pub outbound_allowed_hosts: Vec<String>,
    pub outbound_allowed_ports: Vec<u16>,
    pub max_body_bytes: usize,
    pub log_format: LogFormat,
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        let oidc = OidcConfig {
            client_id: non_empty(lookup("OIDC_CLIENT_ID")),
            client_secret: non_empty(lookup("OIDC_CLIENT_SECRET")),
            redirect_uri: non_empty(lookup("OIDC_REDIRECT_URI")),
            scope: non_empty(lookup("OIDC_SCOPE"))
                .unwrap_or_else(|| "openid profile email".to_string()),
            auth_url: non_empty(lookup("OIDC_AUTH_URL"))
                .unwrap_or_else(|| GOOGLE_AUTH_URL.to_string()),
            token_url: non_empty(lookup("OIDC_TOKEN_URL"))
                .unwrap_or_else(|| GOOGLE_TOKEN_URL.to_string()),
            userinfo_url: non_empty(lookup("OIDC_USERINFO_URL"))
                .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string()),
            request_timeout_secs: parse_or(lookup("OIDC_REQUEST_TIMEOUT_SECS"), 10),
        };

        // Default outbound allowlist: exactly the provider endpoints we call.
        let outbound_allowed_hosts = match non_empty(lookup("OUTBOUND_ALLOWED_HOSTS")) {
            Some(hosts) => split_list(&hosts),
            None => {
                let mut hosts: Vec<String> = [&oidc.token_url, &oidc.userinfo_url]
                    .into_iter()
                    .filter_map(|u| host_of(u))
                    .collect();
                hosts.dedup();
                hosts
            }
        };

        let outbound_allowed_ports = non_empty(lookup("OUTBOUND_ALLOWED_PORTS"))
            .map(|ports| {
                split_list(&ports)
                    .iter()
                    .filter_map(|p| p.parse().ok())
                    .collect()
            })
            .unwrap_or_else(|| vec![443]);

        Self {
            listen_addr: non_empty(lookup("LISTEN_ADDR"))
                .unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            database_url: non_empty(lookup("DATABASE_URL")),
            // max_connections: 10-20 is a good starting point for most deployments
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), 20),
            db_min_connections: parse_or(lookup("DB_MIN_CONNECTIONS"), 5),
            db_acquire_timeout_secs: parse_or(lookup("DB_ACQUIRE_TIMEOUT_SECS"), 30),
            db_idle_timeout_secs: parse_or(lookup("DB_IDLE_TIMEOUT_SECS"), 600), // 10 minutes
            db_max_lifetime_secs: parse_or(lookup("DB_MAX_LIFETIME_SECS"), 1800), // 30 minutes
            environment,
            frontend_origin: non_empty(lookup("FRONTEND_ORIGIN"))
                .map(|o| o.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            jwt_secret: non_empty(lookup("JWT_SECRET")).unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            session_ttl_hours: parse_or(lookup("SESSION_TTL_HOURS"), 24),
            oidc,
            mfa_issuer: non_empty(lookup("MFA_ISSUER")).unwrap_or_else(|| "HospitalApp".to_string()),
            allowed_hosts: non_empty(lookup("ALLOWED_HOSTS"))
                .map(|h| split_list(&h))
                .unwrap_or_else(|| vec!["localhost".to_string(), "127.0.0.1".to_string()]),
            outbound_allowed_hosts,
            outbound_allowed_ports,
            max_body_bytes: parse_or(lookup("MAX_BODY_BYTES"), 1024 * 1024),
            log_format: match lookup("LOG_FORMAT").as_deref().map(str::trim) {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn oauth_settings(&self) -> OAuthSettings {
        OAuthSettings {
            client_id: self.oidc.client_id.clone(),
            client_secret: self.oidc.client_secret.clone(),
            redirect_uri: self.oidc.redirect_uri.clone(),
            scope: self.oidc.scope.clone(),
            authorization_endpoint: self.oidc.auth_url.clone(),
        }
    }

    /// Guard for URLs handed back to browsers
    pub fn redirect_guard(&self) -> UrlGuard {
        UrlGuard::new(&self.allowed_hosts)
    }

    /// Guard for server-initiated HTTP requests
    pub fn outbound_guard(&self) -> UrlGuard {
        UrlGuard::new(&self.outbound_allowed_hosts)
            .with_allowed_ports(self.outbound_allowed_ports.iter().copied())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(database_url) = &self.database_url {
            if !database_url.starts_with("postgres://")
                && !database_url.starts_with("postgresql://")
            {
                return Err(
                    "DATABASE_URL must start with postgres:// or postgresql://".to_string(),
                );
            }
        } else if self.is_production() {
            return Err("DATABASE_URL is required in production".to_string());
        }

        if self.listen_addr.is_empty() {
            return Err("LISTEN_ADDR cannot be empty".to_string());
        }

        if self.is_production() {
            if self.jwt_secret == DEV_JWT_SECRET {
                return Err("JWT_SECRET must be set in production".to_string());
            }
            if self.jwt_secret.len() < MIN_PRODUCTION_SECRET_BYTES {
                return Err(format!(
                    "JWT_SECRET must be at least {} bytes in production",
                    MIN_PRODUCTION_SECRET_BYTES
                ));
            }
        }

        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(format!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            ));
        }

        if self.oidc.request_timeout_secs == 0 {
            return Err("OIDC_REQUEST_TIMEOUT_SECS must be positive".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be positive".to_string());
        }

        if self.redirect_guard().validate(&self.frontend_origin).is_none() {
            return Err(format!(
                "FRONTEND_ORIGIN {} is not an http(s) URL on an ALLOWED_HOSTS host",
                self.frontend_origin
            ));
        }

        let outbound = self.outbound_guard();
        for (name, url) in [
            ("OIDC_TOKEN_URL", &self.oidc.token_url),
            ("OIDC_USERINFO_URL", &self.oidc.userinfo_url),
        ] {
            if let Err(reason) = outbound.check(url) {
                return Err(format!("{} rejected by outbound allowlist: {}", name, reason));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]);
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.frontend_origin, "http://localhost:5173");
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.oidc.scope, "openid profile email");
        assert_eq!(config.oidc.request_timeout_secs, 10);
        assert_eq!(config.mfa_issuer, "HospitalApp");
        assert_eq!(config.allowed_hosts, vec!["localhost", "127.0.0.1"]);
        assert_eq!(
            config.outbound_allowed_hosts,
            vec!["oauth2.googleapis.com", "www.googleapis.com"]
        );
        assert_eq!(config.outbound_allowed_ports, vec![443]);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_with(&[("SESSION_TTL_HOURS", "soon"), ("DB_MAX_CONNECTIONS", "-1")]);
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.db_max_connections, 20);
    }

    #[test]
    fn test_session_ttl_is_bounded() {
        let huge = i64::MAX.to_string();
        let config = config_with(&[("SESSION_TTL_HOURS", huge.as_str())]);
        assert_eq!(config.session_ttl_hours, i64::MAX);
        assert!(config.validate().unwrap_err().contains("SESSION_TTL_HOURS"));

        let config = config_with(&[("SESSION_TTL_HOURS", "0")]);
        assert!(config.validate().is_err());

        let config = config_with(&[("SESSION_TTL_HOURS", "8760")]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_strong_secret() {
        let base = [
            ("APP_ENV", "production"),
            ("DATABASE_URL", "postgres://localhost/hospital"),
        ];
        assert!(config_with(&base).validate().is_err());

        let mut short = base.to_vec();
        short.push(("JWT_SECRET", "too-short"));
        assert!(config_with(&short).validate().is_err());

        let mut strong = base.to_vec();
        strong.push(("JWT_SECRET", "0123456789abcdef0123456789abcdef"));
        assert!(config_with(&strong).validate().is_ok());
    }

    #[test]
    fn test_production_requires_database() {
        let config = config_with(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
        ]);
        assert!(config.validate().unwrap_err().contains("DATABASE_URL"));
    }

    #[test]
    fn test_rejects_non_postgres_url() {
        let config = config_with(&[("DATABASE_URL", "mysql://localhost/db")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frontend_origin_must_be_allowed() {
        let config = config_with(&[("FRONTEND_ORIGIN", "https://evil.example")]);
        assert!(config.validate().unwrap_err().contains("FRONTEND_ORIGIN"));

        let config = config_with(&[
            ("FRONTEND_ORIGIN", "https://app.hospital.example/"),
            ("ALLOWED_HOSTS", "hospital.example"),
        ]);
        assert_eq!(config.frontend_origin, "https://app.hospital.example");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_urls_must_pass_outbound_guard() {
        let config = config_with(&[
            ("OIDC_TOKEN_URL", "http://169.254.169.254/token"),
            ("OUTBOUND_ALLOWED_HOSTS", "oauth2.googleapis.com,www.googleapis.com"),
        ]);
        assert!(config.validate().unwrap_err().contains("OIDC_TOKEN_URL"));
    }

    #[test]
    fn test_lists_are_trimmed() {
        let config = config_with(&[
            ("ALLOWED_HOSTS", " a.example , b.example ,,"),
            ("OUTBOUND_ALLOWED_PORTS", "443, 8443"),
            ("LOG_FORMAT", "json"),
        ]);
        assert_eq!(config.allowed_hosts, vec!["a.example", "b.example"]);
        assert_eq!(config.outbound_allowed_ports, vec![443, 8443]);
        assert_eq!(config.log_format, LogFormat::Json);
    }
}

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::entities::{Staff, User};
use crate::domain::value_objects::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionStaff {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Signed session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub user: SessionUser,
    pub staff: SessionStaff,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to sign session token: {0}")]
    Signing(String),

    #[error("Invalid session token")]
    Invalid,
}

/// Issues and verifies HS256 session tokens
#[derive(Clone)]
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User, staff: &Staff) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id().to_string(),
            user: SessionUser {
                id: user.id().to_string(),
                username: user.username().to_string(),
                email: user.email().to_string(),
            },
            staff: SessionStaff {
                id: staff.id().to_string(),
                name: staff.name().to_string(),
                email: staff.email().to_string(),
                role: staff.role(),
            },
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| SessionError::Invalid)
    }
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> (User, Staff) {
        let user = User::from_external_login("ada@example.com".to_string());
        let staff = Staff::from_external_login("Ada".to_string(), "ada@example.com".to_string());
        (user, staff)
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = SessionIssuer::new("test-secret-that-is-long-enough-123", 24);
        let (user, staff) = identity();

        let token = issuer.issue(&user, &staff).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id().to_string());
        assert_eq!(claims.user.email, "ada@example.com");
        assert_eq!(claims.staff.role, Role::Patient);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let (user, staff) = identity();
        let token = SessionIssuer::new("secret-a", 24).issue(&user, &staff).unwrap();
        assert!(matches!(
            SessionIssuer::new("secret-b", 24).verify(&token),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let (user, staff) = identity();
        // Negative TTL puts exp well outside the default leeway.
        let issuer = SessionIssuer::new("secret", -2);
        let token = issuer.issue(&user, &staff).unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = SessionIssuer::new("secret", 24);
        assert!(issuer.verify("not.a.token").is_err());
        assert!(issuer.verify("").is_err());
    }
}

use chrono::{DateTime, Utc};

use crate::domain::value_objects::ResourceId;

/// Stored in place of a password hash for accounts created through external login.
pub const OAUTH_PASSWORD_MARKER: &str = "oauth-no-password";

/// Data structure for reconstructing users from database
#[derive(Debug, Clone)]
pub struct UserDbData {
    pub id: ResourceId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub two_factor_secret: Option<String>,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Login account. Unique by email.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: ResourceId,
    username: String,
    email: String,
    password: String,
    two_factor_secret: Option<String>,
    two_factor_enabled: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Account lazily created on first external login: the email doubles as username.
    pub fn from_external_login(email: String) -> Self {
        Self {
            id: ResourceId::new(),
            username: email.clone(),
            email,
            password: OAUTH_PASSWORD_MARKER.to_string(),
            two_factor_secret: None,
            two_factor_enabled: false,
            created_at: Utc::now(),
        }
    }

    /// Reconstruct from database data (used by repository)
    pub fn from_db(db_data: UserDbData) -> Self {
        Self {
            id: db_data.id,
            username: db_data.username,
            email: db_data.email,
            password: db_data.password,
            two_factor_secret: db_data.two_factor_secret,
            two_factor_enabled: db_data.two_factor_enabled,
            created_at: db_data.created_at,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn two_factor_secret(&self) -> Option<&str> {
        self.two_factor_secret.as_deref()
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.two_factor_enabled
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn has_external_login_only(&self) -> bool {
        self.password == OAUTH_PASSWORD_MARKER
    }

    /// Store a secret awaiting confirmation; 2FA stays off until verified.
    pub fn begin_two_factor_setup(&mut self, secret: String) {
        self.two_factor_secret = Some(secret);
        self.two_factor_enabled = false;
    }

    pub fn enable_two_factor(&mut self) {
        self.two_factor_enabled = true;
    }

    pub fn disable_two_factor(&mut self) {
        self.two_factor_secret = None;
        self.two_factor_enabled = false;
    }
}

use chrono::{DateTime, Utc};

use super::user::OAUTH_PASSWORD_MARKER;
use crate::domain::value_objects::{ResourceId, Role};

/// Data structure for reconstructing staff records from database
#[derive(Debug, Clone)]
pub struct StaffDbData {
    pub id: ResourceId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Hospital staff profile. Unique by email; carries the role used for authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct Staff {
    id: ResourceId,
    name: String,
    email: String,
    password: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl Staff {
    pub fn from_external_login(name: String, email: String) -> Self {
        Self {
            id: ResourceId::new(),
            name,
            email,
            password: OAUTH_PASSWORD_MARKER.to_string(),
            role: Role::default(),
            created_at: Utc::now(),
        }
    }

    /// Reconstruct from database data (used by repository)
    pub fn from_db(db_data: StaffDbData) -> Self {
        Self {
            id: db_data.id,
            name: db_data.name,
            email: db_data.email,
            password: db_data.password,
            role: db_data.role,
            created_at: db_data.created_at,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

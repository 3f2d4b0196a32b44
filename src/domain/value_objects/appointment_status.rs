use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

/// Appointment lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AppointmentStatus {
    Active,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Active,
        AppointmentStatus::Canceled,
        AppointmentStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Active => "Active",
            AppointmentStatus::Canceled => "Canceled",
            AppointmentStatus::Completed => "Completed",
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        AppointmentStatus::Active
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = DomainError;

    // Exact match only: "active" is not a valid status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(AppointmentStatus::Active),
            "Canceled" => Ok(AppointmentStatus::Canceled),
            "Completed" => Ok(AppointmentStatus::Completed),
            _ => Err(DomainError::InvalidAppointmentStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_from_str_valid() {
        for status in AppointmentStatus::ALL {
            assert_eq!(AppointmentStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_from_str_is_case_sensitive() {
        assert!(AppointmentStatus::from_str("active").is_err());
        assert!(AppointmentStatus::from_str("CANCELED").is_err());
        assert!(AppointmentStatus::from_str("Cancelled").is_err());
    }

    #[test]
    fn test_status_serializes_as_display_name() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Completed).unwrap(),
            "\"Completed\""
        );
    }
}

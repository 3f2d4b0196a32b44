use chrono::{DateTime, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::errors::DomainError;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("Invalid regex pattern for times")
});

/// Calendar date of an appointment.
///
/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, of which only the date
/// part is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, format = Date, example = "2026-03-14")]
pub struct AppointmentDate(NaiveDate);

impl AppointmentDate {
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl std::str::FromStr for AppointmentDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.date_naive()))
            .map_err(|_| DomainError::InvalidDate(s.to_string()))
    }
}

impl std::fmt::Display for AppointmentDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl TryFrom<String> for AppointmentDate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AppointmentDate> for String {
    fn from(date: AppointmentDate) -> Self {
        date.to_string()
    }
}

/// Wall-clock time of an appointment, stored zero-padded as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "09:30")]
pub struct AppointmentTime(NaiveTime);

impl AppointmentTime {
    pub fn is_valid(candidate: &str) -> bool {
        TIME_PATTERN.is_match(candidate)
    }
}

impl std::str::FromStr for AppointmentTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(DomainError::InvalidTime(s.to_string()));
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| DomainError::InvalidTime(s.to_string()))
    }
}

impl std::fmt::Display for AppointmentTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl TryFrom<String> for AppointmentTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AppointmentTime> for String {
    fn from(time: AppointmentTime) -> Self {
        time.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_accepts_plain_and_rfc3339() {
        let plain: AppointmentDate = "2026-03-14".parse().unwrap();
        let full: AppointmentDate = "2026-03-14T09:30:00Z".parse().unwrap();
        assert_eq!(plain, full);
        assert_eq!(plain.to_string(), "2026-03-14");
    }

    #[test]
    fn test_date_rejects_garbage() {
        for candidate in ["", "tomorrow", "2026-13-01", "14/03/2026", "2026-02-30"] {
            assert!(
                candidate.parse::<AppointmentDate>().is_err(),
                "Should reject: {}",
                candidate
            );
        }
    }

    #[test]
    fn test_time_normalizes_single_digit_hour() {
        let time: AppointmentTime = "9:05".parse().unwrap();
        assert_eq!(time.to_string(), "09:05");
    }

    #[test]
    fn test_time_bounds() {
        assert!("00:00".parse::<AppointmentTime>().is_ok());
        assert!("23:59".parse::<AppointmentTime>().is_ok());
        assert!("24:00".parse::<AppointmentTime>().is_err());
        assert!("12:60".parse::<AppointmentTime>().is_err());
        assert!("12:5".parse::<AppointmentTime>().is_err());
        assert!("12:30:00".parse::<AppointmentTime>().is_err());
    }
}

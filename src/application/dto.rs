use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{
    entities::{Appointment, AppointmentDetails},
    errors::DomainError,
    value_objects::AppointmentStatus,
};

/// Body of appointment create/update requests.
///
/// Every field is optional at the serde level so a missing field is
/// reported by validation alongside every other problem instead of failing
/// deserialization on the first one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[validate(
        required(message = "Patient name is required"),
        length(min = 1, max = 100, message = "Patient name must be between 1 and 100 characters"),
        custom(function = "crate::application::validation::patient_name_is_clean")
    )]
    #[schema(example = "Jane Doe")]
    pub patient_name: Option<String>,

    #[validate(
        required(message = "Staff ID is required"),
        custom(function = "crate::application::validation::staff_id_format")
    )]
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub staff_id: Option<String>,

    #[validate(
        required(message = "Date is required"),
        custom(function = "crate::application::validation::date_format")
    )]
    #[schema(example = "2026-03-14")]
    pub date: Option<String>,

    #[validate(
        required(message = "Time is required"),
        custom(function = "crate::application::validation::time_format")
    )]
    #[schema(example = "09:30")]
    pub time: Option<String>,

    #[validate(
        required(message = "Reason is required"),
        length(min = 1, max = 500, message = "Reason must be between 1 and 500 characters"),
        custom(function = "crate::application::validation::reason_is_clean")
    )]
    #[schema(example = "Annual checkup")]
    pub reason: Option<String>,

    #[validate(
        required(message = "Status is required"),
        custom(function = "crate::application::validation::status_value")
    )]
    #[schema(example = "Active")]
    pub status: Option<String>,
}

impl AppointmentRequest {
    /// Convert a request that already passed `validate()` into domain values.
    pub fn into_details(self) -> Result<AppointmentDetails, DomainError> {
        fn field(value: Option<String>, name: &str) -> Result<String, DomainError> {
            value.ok_or_else(|| DomainError::MissingField(name.to_string()))
        }

        Ok(AppointmentDetails {
            patient_name: field(self.patient_name, "patientName")?,
            staff_id: field(self.staff_id, "staffId")?.parse()?,
            date: field(self.date, "date")?.parse()?,
            time: field(self.time, "time")?.parse()?,
            reason: field(self.reason, "reason")?,
            status: field(self.status, "status")?.parse()?,
        })
    }
}

/// DTO for appointment responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: String,
    pub patient_name: String,
    pub staff_id: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Appointment> for AppointmentDto {
    fn from(appointment: Appointment) -> Self {
        Self {
            id: appointment.id().to_string(),
            patient_name: appointment.patient_name().to_string(),
            staff_id: appointment.staff_id().to_string(),
            date: appointment.date().to_string(),
            time: appointment.time().to_string(),
            reason: appointment.reason().to_string(),
            status: appointment.status(),
            created_at: appointment.created_at().to_rfc3339(),
            updated_at: appointment.updated_at().to_rfc3339(),
        }
    }
}

/// Provisioning data for an authenticator app
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MfaSetupResponse {
    /// `otpauth://` URI
    pub otpauth: String,
    /// SVG QR code of the URI as a `data:` URL
    pub qr: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MfaVerifyRequest {
    #[schema(example = "123456")]
    pub token: Option<String>,
}

/// Plain `{"message": ...}` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

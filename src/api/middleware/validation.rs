use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::api::errors::ApiError;
use crate::application::dto::{AppointmentRequest, MfaVerifyRequest};

/// Field error details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// camelCase name of the offending JSON field
    pub field: String,
    pub message: String,
}

/// `patient_name` → `patientName`
fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten validator output into a stable, field-sorted list
pub fn field_errors(validation_errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = validation_errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = to_camel_case(&field);
            errors.iter().map(move |error| FieldError {
                field: field.clone(),
                message: error
                    .message
                    .as_ref()
                    .map(|cow| cow.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string()),
            })
        })
        .collect()
}

/// JSON shape a request body must have before it is deserialized.
///
/// A field holding the wrong JSON type is reported under its own name rather
/// than as a failure of the whole body.
pub trait BodyShape {
    /// `(camelCase field, message)` for fields that must be strings when present,
    /// in report order
    const STRING_FIELDS: &'static [(&'static str, &'static str)];

    fn shape_errors(body: &Value) -> Vec<FieldError> {
        let Some(object) = body.as_object() else {
            return vec![FieldError {
                field: "body".to_string(),
                message: "Request body must be a JSON object".to_string(),
            }];
        };

        Self::STRING_FIELDS
            .iter()
            .filter(|(field, _)| {
                !matches!(
                    object.get(*field),
                    None | Some(Value::Null) | Some(Value::String(_))
                )
            })
            .map(|(field, message)| FieldError {
                field: field.to_string(),
                message: message.to_string(),
            })
            .collect()
    }
}

impl BodyShape for AppointmentRequest {
    const STRING_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("date", "Invalid date format"),
        ("patientName", "Patient name must be between 1 and 100 characters"),
        ("reason", "Reason must be between 1 and 500 characters"),
        ("staffId", "Invalid staff ID format"),
        ("status", "Invalid status. Must be Active, Canceled, or Completed"),
        ("time", "Invalid time format (HH:MM)"),
    ];
}

impl BodyShape for MfaVerifyRequest {
    const STRING_FIELDS: &'static [(&'static str, &'static str)] =
        &[("token", "Token must be a string")];
}

/// Validate a payload and return a proper API error response
pub fn validate_and_respond<T>(payload: &T) -> Result<(), ApiError>
where
    T: Validate,
{
    payload
        .validate()
        .map_err(|validation_errors| ApiError::validation(field_errors(&validation_errors)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("patient_name"), "patientName");
        assert_eq!(to_camel_case("staff_id"), "staffId");
        assert_eq!(to_camel_case("date"), "date");
    }

    #[test]
    fn test_missing_fields_are_reported_per_field() {
        let errors = AppointmentRequest::default().validate().unwrap_err();
        let fields: Vec<String> = field_errors(&errors).into_iter().map(|e| e.field).collect();

        assert_eq!(
            fields,
            vec!["date", "patientName", "reason", "staffId", "status", "time"]
        );
    }

    #[test]
    fn test_wrongly_typed_fields_are_reported_by_name() {
        let body = serde_json::json!({
            "patientName": 123,
            "staffId": "507f1f77bcf86cd799439011",
            "date": null,
            "reason": ["a"],
        });
        let errors = AppointmentRequest::shape_errors(&body);

        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "patientName".to_string(),
                    message: "Patient name must be between 1 and 100 characters".to_string(),
                },
                FieldError {
                    field: "reason".to_string(),
                    message: "Reason must be between 1 and 500 characters".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_string_and_missing_fields_have_no_shape_errors() {
        let body = serde_json::json!({ "patientName": "Jane Doe" });
        assert!(AppointmentRequest::shape_errors(&body).is_empty());
    }

    #[test]
    fn test_non_object_body_is_a_body_error() {
        let errors = MfaVerifyRequest::shape_errors(&serde_json::json!(["123456"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "body");
    }

    #[test]
    fn test_validate_and_respond_status() {
        let err = validate_and_respond(&AppointmentRequest::default()).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Validation failed");
    }
}

//! Field validators plugged into `validator` derives on request DTOs

use std::borrow::Cow;

use validator::ValidationError;

use crate::domain::validation::Sanitizer;
use crate::domain::value_objects::{
    AppointmentDate, AppointmentStatus, AppointmentTime, ResourceId,
};

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn patient_name_is_clean<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    if Sanitizer::is_sanitizer_stable(value.as_ref()) {
        Ok(())
    } else {
        Err(invalid(
            "invalid_characters",
            "Patient name contains invalid characters",
        ))
    }
}

pub fn reason_is_clean<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    if Sanitizer::is_sanitizer_stable(value.as_ref()) {
        Ok(())
    } else {
        Err(invalid("invalid_characters", "Reason contains invalid characters"))
    }
}

pub fn staff_id_format<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    if ResourceId::is_valid(value.as_ref()) {
        Ok(())
    } else {
        Err(invalid("invalid_id", "Invalid staff ID format"))
    }
}

pub fn date_format<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    value
        .as_ref()
        .parse::<AppointmentDate>()
        .map(|_| ())
        .map_err(|_| invalid("invalid_date", "Invalid date format"))
}

pub fn time_format<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    if AppointmentTime::is_valid(value.as_ref()) {
        Ok(())
    } else {
        Err(invalid("invalid_time", "Invalid time format (HH:MM)"))
    }
}

pub fn status_value<T: AsRef<str> + ?Sized>(value: &T) -> Result<(), ValidationError> {
    value
        .as_ref()
        .parse::<AppointmentStatus>()
        .map(|_| ())
        .map_err(|_| {
            invalid(
                "invalid_status",
                "Invalid status. Must be Active, Canceled, or Completed",
            )
        })
}

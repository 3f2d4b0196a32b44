use chrono::{DateTime, Utc};

use crate::domain::value_objects::{AppointmentDate, AppointmentStatus, AppointmentTime, ResourceId};

/// Validated, sanitized appointment fields supplied by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDetails {
    pub patient_name: String,
    pub staff_id: ResourceId,
    pub date: AppointmentDate,
    pub time: AppointmentTime,
    pub reason: String,
    pub status: AppointmentStatus,
}

/// Data structure for reconstructing appointments from database
#[derive(Debug, Clone)]
pub struct AppointmentDbData {
    pub id: ResourceId,
    pub details: AppointmentDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    id: ResourceId,
    details: AppointmentDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(details: AppointmentDetails) -> Self {
        let now = Utc::now();
        Self {
            id: ResourceId::new(),
            details,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct from database data (used by repository)
    pub fn from_db(db_data: AppointmentDbData) -> Self {
        Self {
            id: db_data.id,
            details: db_data.details,
            created_at: db_data.created_at,
            updated_at: db_data.updated_at,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn details(&self) -> &AppointmentDetails {
        &self.details
    }

    pub fn patient_name(&self) -> &str {
        &self.details.patient_name
    }

    pub fn staff_id(&self) -> &ResourceId {
        &self.details.staff_id
    }

    pub fn date(&self) -> AppointmentDate {
        self.details.date
    }

    pub fn time(&self) -> AppointmentTime {
        self.details.time
    }

    pub fn reason(&self) -> &str {
        &self.details.reason
    }

    pub fn status(&self) -> AppointmentStatus {
        self.details.status
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    /// Replace every client-editable field; the id and creation time are kept.
    pub fn replace_details(&mut self, details: AppointmentDetails) {
        self.details = details;
        self.updated_at = Utc::now();
    }
}

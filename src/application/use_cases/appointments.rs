use std::sync::Arc;

use tracing::info;

use crate::application::{
    dto::AppointmentDto,
    errors::AppointmentUseCaseError,
    ports::{AppointmentRepository, RepositoryError},
};
use crate::domain::{
    entities::{Appointment, AppointmentDetails},
    value_objects::ResourceId,
};

/// Use case for booking appointments
pub struct CreateAppointmentUseCase {
    repository: Arc<dyn AppointmentRepository>,
}

impl CreateAppointmentUseCase {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        details: AppointmentDetails,
    ) -> Result<AppointmentDto, AppointmentUseCaseError> {
        let appointment = Appointment::new(details);
        self.repository.create(&appointment).await?;

        info!(
            appointment_id = %appointment.id(),
            staff_id = %appointment.staff_id(),
            "Appointment created"
        );
        Ok(appointment.into())
    }
}

/// Use case for listing appointments, optionally for one staff member
pub struct ListAppointmentsUseCase {
    repository: Arc<dyn AppointmentRepository>,
}

impl ListAppointmentsUseCase {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        staff_id: Option<&ResourceId>,
    ) -> Result<Vec<AppointmentDto>, AppointmentUseCaseError> {
        let appointments = match staff_id {
            Some(staff_id) => self.repository.list_by_staff(staff_id).await?,
            None => self.repository.list_all().await?,
        };
        Ok(appointments.into_iter().map(Into::into).collect())
    }
}

/// Use case for fetching a single appointment
pub struct GetAppointmentUseCase {
    repository: Arc<dyn AppointmentRepository>,
}

impl GetAppointmentUseCase {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &ResourceId) -> Result<AppointmentDto, AppointmentUseCaseError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppointmentUseCaseError::NotFound(id.to_string()))
    }
}

/// Use case for replacing an appointment's fields
pub struct UpdateAppointmentUseCase {
    repository: Arc<dyn AppointmentRepository>,
}

impl UpdateAppointmentUseCase {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        id: &ResourceId,
        details: AppointmentDetails,
    ) -> Result<AppointmentDto, AppointmentUseCaseError> {
        let mut appointment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppointmentUseCaseError::NotFound(id.to_string()))?;

        appointment.replace_details(details);

        match self.repository.update(&appointment).await {
            Ok(()) => {}
            // Deleted between the read and the write
            Err(RepositoryError::NotFound(_)) => {
                return Err(AppointmentUseCaseError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        info!(appointment_id = %id, status = %appointment.status(), "Appointment updated");
        Ok(appointment.into())
    }
}

/// Use case for deleting appointments
pub struct DeleteAppointmentUseCase {
    repository: Arc<dyn AppointmentRepository>,
}

impl DeleteAppointmentUseCase {
    pub fn new(repository: Arc<dyn AppointmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: &ResourceId) -> Result<(), AppointmentUseCaseError> {
        if !self.repository.delete(id).await? {
            return Err(AppointmentUseCaseError::NotFound(id.to_string()));
        }
        info!(appointment_id = %id, "Appointment deleted");
        Ok(())
    }
}

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::RepositoryError;
use crate::domain::entities::Appointment;
use crate::domain::value_objects::ResourceId;

/// Port for appointment persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Appointment>, RepositoryError>;

    /// All appointments, newest first
    async fn list_all(&self) -> Result<Vec<Appointment>, RepositoryError>;

    async fn list_by_staff(&self, staff_id: &ResourceId)
        -> Result<Vec<Appointment>, RepositoryError>;

    /// Overwrite an existing appointment; `NotFound` when the id is unknown
    async fn update(&self, appointment: &Appointment) -> Result<(), RepositoryError>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: &ResourceId) -> Result<bool, RepositoryError>;
}

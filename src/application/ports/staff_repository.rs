use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::RepositoryError;
use crate::domain::entities::Staff;
use crate::domain::value_objects::ResourceId;

/// Port for staff profile persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<Staff>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, RepositoryError>;

    /// Insert a new staff record; fails with `AlreadyExists` when the email is taken
    async fn create(&self, staff: &Staff) -> Result<(), RepositoryError>;
}

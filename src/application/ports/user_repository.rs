use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::RepositoryError;
use crate::domain::entities::User;
use crate::domain::value_objects::ResourceId;

/// Port for login account persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user; fails with `AlreadyExists` when the email is taken
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    /// Persist the user's two-factor secret and enabled flag
    async fn update_two_factor(&self, user: &User) -> Result<(), RepositoryError>;
}

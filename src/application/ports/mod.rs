mod appointment_repository;
mod identity_provider;
mod repository_error;
mod staff_repository;
mod user_repository;

pub use appointment_repository::AppointmentRepository;
pub use identity_provider::{IdentityProvider, ProviderError, ProviderTokens, ProviderUserInfo};
pub use repository_error::RepositoryError;
pub use staff_repository::StaffRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
#[cfg(test)]
pub use staff_repository::MockStaffRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

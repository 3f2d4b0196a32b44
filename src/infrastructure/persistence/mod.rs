mod in_memory;
mod postgres_appointment_repository;
mod postgres_staff_repository;
mod postgres_user_repository;

pub use in_memory::{
    InMemoryAppointmentRepository, InMemoryStaffRepository, InMemoryUserRepository,
};
pub use postgres_appointment_repository::PostgresAppointmentRepository;
pub use postgres_staff_repository::PostgresStaffRepository;
pub use postgres_user_repository::PostgresUserRepository;

mod appointment_status;
mod appointment_time;
mod resource_id;
mod role;

pub use appointment_status::AppointmentStatus;
pub use appointment_time::{AppointmentDate, AppointmentTime};
pub use resource_id::ResourceId;
pub use role::Role;

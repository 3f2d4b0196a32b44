mod appointment;
mod staff;
mod user;

pub use appointment::{Appointment, AppointmentDbData, AppointmentDetails};
pub use staff::{Staff, StaffDbData};
pub use user::{User, UserDbData, OAUTH_PASSWORD_MARKER};

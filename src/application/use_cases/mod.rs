mod appointments;
mod mfa;

pub use appointments::{
    CreateAppointmentUseCase, DeleteAppointmentUseCase, GetAppointmentUseCase,
    ListAppointmentsUseCase, UpdateAppointmentUseCase,
};
pub use mfa::{DisableMfaUseCase, SetupMfaUseCase, VerifyMfaUseCase};

pub mod appointments;
pub mod health;
pub mod health_checks;
pub mod mfa;
pub mod oauth;
pub mod session;


pub use appointments::{
    create_appointment_handler, delete_appointment_handler, get_appointment_handler,
    list_appointments_by_staff_handler, list_appointments_handler, update_appointment_handler,
};
pub use health::{health_handler, readiness_handler};
pub use mfa::{disable_mfa_handler, setup_mfa_handler, verify_mfa_handler};
pub use oauth::{oauth_callback_handler, oauth_login_handler, OAuthState};
pub use session::me_handler;

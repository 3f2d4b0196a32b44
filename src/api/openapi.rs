use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::handlers::health::{HealthResponse, ReadinessResponse};
use crate::api::middleware::validation::FieldError;
use crate::application::dto::{
    AppointmentDto, AppointmentRequest, MessageResponse, MfaSetupResponse, MfaVerifyRequest,
};
use crate::application::oauth::{SessionClaims, SessionStaff, SessionUser};
use crate::domain::value_objects::{AppointmentStatus, Role};

/// Registers the bearer session-token scheme
struct SessionTokenAddon;

impl Modify for SessionTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI specification for the hospital API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hospital API",
        version = "1.0.0",
        description = "Appointments, OAuth login and two-factor enrolment behind a validating input guard"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::readiness_handler,
        crate::api::handlers::appointments::create_appointment_handler,
        crate::api::handlers::appointments::list_appointments_handler,
        crate::api::handlers::appointments::list_appointments_by_staff_handler,
        crate::api::handlers::appointments::get_appointment_handler,
        crate::api::handlers::appointments::update_appointment_handler,
        crate::api::handlers::appointments::delete_appointment_handler,
        crate::api::handlers::oauth::oauth_login_handler,
        crate::api::handlers::oauth::oauth_callback_handler,
        crate::api::handlers::session::me_handler,
        crate::api::handlers::mfa::setup_mfa_handler,
        crate::api::handlers::mfa::verify_mfa_handler,
        crate::api::handlers::mfa::disable_mfa_handler,
    ),
    components(
        schemas(
            AppointmentRequest,
            AppointmentDto,
            AppointmentStatus,
            MessageResponse,
            FieldError,
            MfaSetupResponse,
            MfaVerifyRequest,
            SessionClaims,
            SessionUser,
            SessionStaff,
            Role,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    modifiers(&SessionTokenAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "appointments", description = "Appointment management"),
        (name = "auth", description = "OAuth login and session introspection"),
        (name = "mfa", description = "TOTP two-factor enrolment")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_guarded_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/appointments/{id}"));
        assert!(paths.contains_key("/api/v1/appointments/doctor/{staff_id}"));
        assert!(paths.contains_key("/api/v1/auth/oauth/callback"));
        assert!(paths.contains_key("/api/v1/auth/mfa/verify"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}

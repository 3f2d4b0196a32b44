use axum::{
    http::header,
    middleware as axum_middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer,
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use utoipa::OpenApi;

use crate::api::handlers::{
    create_appointment_handler, delete_appointment_handler, disable_mfa_handler,
    get_appointment_handler, health_handler, list_appointments_by_staff_handler,
    list_appointments_handler, me_handler, oauth_callback_handler, oauth_login_handler,
    readiness_handler, setup_mfa_handler, update_appointment_handler, verify_mfa_handler,
    OAuthState,
};
use crate::api::middleware::{
    auth, cors, input_sanitization::request_guard_middleware, metrics,
    security_headers::{security_headers_middleware, SecurityHeadersConfig},
};
use crate::api::openapi::ApiDoc;
use crate::application::oauth::{OAuthFlow, SessionIssuer};
use crate::application::use_cases::{
    CreateAppointmentUseCase, DeleteAppointmentUseCase, DisableMfaUseCase,
    GetAppointmentUseCase, ListAppointmentsUseCase, SetupMfaUseCase, UpdateAppointmentUseCase,
    VerifyMfaUseCase,
};
use crate::config::Config;

/// Application state container
#[derive(Clone)]
pub struct AppState {
    /// `None` when running on in-memory repositories
    pub pool: Option<Arc<PgPool>>,
    pub config: Arc<Config>,
    pub create_appointment_use_case: Arc<CreateAppointmentUseCase>,
    pub list_appointments_use_case: Arc<ListAppointmentsUseCase>,
    pub get_appointment_use_case: Arc<GetAppointmentUseCase>,
    pub update_appointment_use_case: Arc<UpdateAppointmentUseCase>,
    pub delete_appointment_use_case: Arc<DeleteAppointmentUseCase>,
    pub setup_mfa_use_case: Arc<SetupMfaUseCase>,
    pub verify_mfa_use_case: Arc<VerifyMfaUseCase>,
    pub disable_mfa_use_case: Arc<DisableMfaUseCase>,
    pub oauth_flow: Arc<OAuthFlow>,
    pub sessions: Arc<SessionIssuer>,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let oauth_state = OAuthState {
        flow: Arc::clone(&state.oauth_flow),
        frontend_origin: state.config.frontend_origin.clone(),
        secure_cookies: state.config.is_production(),
        redirect_guard: Arc::new(state.config.redirect_guard()),
    };

    let appointments = Router::new()
        .route(
            "/api/v1/appointments",
            post(create_appointment_handler)
                .with_state(Arc::clone(&state.create_appointment_use_case)),
        )
        .route(
            "/api/v1/appointments",
            get(list_appointments_handler)
                .with_state(Arc::clone(&state.list_appointments_use_case)),
        )
        .route(
            "/api/v1/appointments/doctor/{staff_id}",
            get(list_appointments_by_staff_handler)
                .with_state(Arc::clone(&state.list_appointments_use_case)),
        )
        .route(
            "/api/v1/appointments/{id}",
            get(get_appointment_handler).with_state(Arc::clone(&state.get_appointment_use_case)),
        )
        .route(
            "/api/v1/appointments/{id}",
            axum::routing::put(update_appointment_handler)
                .with_state(Arc::clone(&state.update_appointment_use_case)),
        )
        .route(
            "/api/v1/appointments/{id}",
            axum::routing::delete(delete_appointment_handler)
                .with_state(Arc::clone(&state.delete_appointment_use_case)),
        );

    let oauth = Router::new()
        .route("/api/v1/auth/oauth/login", get(oauth_login_handler))
        .route("/api/v1/auth/oauth/callback", get(oauth_callback_handler))
        .with_state(oauth_state);

    // Session required
    let protected = Router::new()
        .route("/api/v1/auth/me", get(me_handler))
        .route(
            "/api/v1/auth/mfa/setup",
            post(setup_mfa_handler).with_state(Arc::clone(&state.setup_mfa_use_case)),
        )
        .route(
            "/api/v1/auth/mfa/verify",
            post(verify_mfa_handler).with_state(Arc::clone(&state.verify_mfa_use_case)),
        )
        .route(
            "/api/v1/auth/mfa/disable",
            post(disable_mfa_handler).with_state(Arc::clone(&state.disable_mfa_use_case)),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            Arc::clone(&state.sessions),
            auth::auth_middleware,
        ));

    let security_headers = Arc::new(SecurityHeadersConfig::for_environment(
        state.config.is_production(),
    ));

    Router::new()
        // Health check (no auth required)
        .route("/health", get(health_handler))
        .route(
            "/health/ready",
            get(readiness_handler).with_state(state.pool.clone()),
        )
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(appointments)
        .merge(oauth)
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(axum_middleware::from_fn(request_guard_middleware))
        .layer(CompressionLayer::new())
        .layer(axum_middleware::from_fn_with_state(
            security_headers,
            security_headers_middleware,
        ))
        .layer(cors::create_cors_layer(&state.config.frontend_origin))
        .layer(axum_middleware::from_fn(metrics::metrics_middleware))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
}

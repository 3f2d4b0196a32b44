use axum::{extract::State, http::StatusCode, response::Json};
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::api::middleware::input_sanitization::{AppointmentId, JsonBody, StaffId};
use crate::api::middleware::validation::validate_and_respond;
use crate::application::{
    dto::{AppointmentDto, AppointmentRequest, MessageResponse},
    use_cases::{
        CreateAppointmentUseCase, DeleteAppointmentUseCase, GetAppointmentUseCase,
        ListAppointmentsUseCase, UpdateAppointmentUseCase,
    },
};
use crate::domain::entities::AppointmentDetails;

/// Validate and convert a request body exactly as received
fn validated_details(request: AppointmentRequest) -> Result<AppointmentDetails, ApiError> {
    validate_and_respond(&request)?;
    Ok(request.into_details()?)
}

/// POST /api/v1/appointments
#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "appointments",
    request_body = AppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentDto),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_appointment_handler(
    State(use_case): State<Arc<CreateAppointmentUseCase>>,
    JsonBody(request): JsonBody<AppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentDto>), ApiError> {
    let details = validated_details(request)?;
    let appointment = use_case.execute(details).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/v1/appointments
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    tag = "appointments",
    responses(
        (status = 200, description = "All appointments, newest first", body = [AppointmentDto]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_appointments_handler(
    State(use_case): State<Arc<ListAppointmentsUseCase>>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    Ok(Json(use_case.execute(None).await?))
}

/// GET /api/v1/appointments/doctor/{staff_id}
#[utoipa::path(
    get,
    path = "/api/v1/appointments/doctor/{staff_id}",
    tag = "appointments",
    params(
        ("staff_id" = String, Path, description = "24-character hex staff identifier")
    ),
    responses(
        (status = 200, description = "Appointments of one staff member", body = [AppointmentDto]),
        (status = 400, description = "Invalid staff ID format"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_appointments_by_staff_handler(
    State(use_case): State<Arc<ListAppointmentsUseCase>>,
    staff_id: StaffId,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    Ok(Json(use_case.execute(Some(staff_id.id())).await?))
}

/// GET /api/v1/appointments/{id}
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    tag = "appointments",
    params(
        ("id" = String, Path, description = "24-character hex appointment identifier")
    ),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDto),
        (status = 400, description = "Invalid appointment ID format"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment_handler(
    State(use_case): State<Arc<GetAppointmentUseCase>>,
    id: AppointmentId,
) -> Result<Json<AppointmentDto>, ApiError> {
    Ok(Json(use_case.execute(id.id()).await?))
}

/// PUT /api/v1/appointments/{id}
#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}",
    tag = "appointments",
    params(
        ("id" = String, Path, description = "24-character hex appointment identifier")
    ),
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentDto),
        (status = 400, description = "Invalid ID or validation failed"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn update_appointment_handler(
    State(use_case): State<Arc<UpdateAppointmentUseCase>>,
    id: AppointmentId,
    JsonBody(request): JsonBody<AppointmentRequest>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let details = validated_details(request)?;
    Ok(Json(use_case.execute(id.id(), details).await?))
}

/// DELETE /api/v1/appointments/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    tag = "appointments",
    params(
        ("id" = String, Path, description = "24-character hex appointment identifier")
    ),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 400, description = "Invalid appointment ID format"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn delete_appointment_handler(
    State(use_case): State<Arc<DeleteAppointmentUseCase>>,
    id: AppointmentId,
) -> Result<Json<MessageResponse>, ApiError> {
    use_case.execute(id.id()).await?;
    Ok(Json(MessageResponse::new("Appointment deleted successfully")))
}

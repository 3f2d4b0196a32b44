use std::collections::HashMap;
use std::marker::PhantomData;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::api::errors::ApiError;
use crate::api::middleware::validation::{BodyShape, FieldError};
use crate::domain::validation::sanitize_identifier;
use crate::domain::value_objects::ResourceId;

/// A path parameter holding a resource identifier
pub trait IdParam {
    /// Route parameter name, e.g. `id` for `/{id}`
    const NAME: &'static str;
    /// Used in the rejection message: "Invalid <label> ID format"
    const LABEL: &'static str;
}

pub struct AppointmentIdParam;

impl IdParam for AppointmentIdParam {
    const NAME: &'static str = "id";
    const LABEL: &'static str = "appointment";
}

pub struct StaffIdParam;

impl IdParam for StaffIdParam {
    const NAME: &'static str = "staff_id";
    const LABEL: &'static str = "staff";
}

/// Path identifier that went through the identifier sanitizer.
///
/// Anything that does not reduce to exactly 24 hex characters is rejected with
/// a 400 before the handler runs, so repositories only ever see well-formed ids.
#[derive(Debug, Clone)]
pub struct SanitizedId<P> {
    id: ResourceId,
    _param: PhantomData<fn() -> P>,
}

pub type AppointmentId = SanitizedId<AppointmentIdParam>;
pub type StaffId = SanitizedId<StaffIdParam>;

impl<P> SanitizedId<P> {
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn into_inner(self) -> ResourceId {
        self.id
    }
}

impl<S, P> FromRequestParts<S> for SanitizedId<P>
where
    S: Send + Sync,
    P: IdParam,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::bad_request(format!("Invalid {} ID format", P::LABEL));

        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid())?;

        let raw = params.get(P::NAME).ok_or_else(invalid)?;

        match sanitize_identifier(raw) {
            Some(id) => Ok(Self {
                id,
                _param: PhantomData,
            }),
            None => {
                warn!(param = P::NAME, "Rejected malformed identifier");
                Err(invalid())
            }
        }
    }
}

/// JSON body whose decoding failures surface as `400 Validation failed`.
///
/// The body is parsed as a JSON value first so a wrongly typed field is
/// reported under its own name; only then is it deserialized into `T`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + BodyShape,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        let shape_errors = T::shape_errors(&value);
        if !shape_errors.is_empty() {
            warn!(
                fields = ?shape_errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "Request body has wrongly typed fields"
            );
            return Err(ApiError::validation(shape_errors));
        }

        serde_json::from_value(value).map(Self).map_err(|e| {
            ApiError::validation(vec![FieldError {
                field: "body".to_string(),
                message: "Request body has the wrong shape".to_string(),
            }])
            .with_detail(e.to_string())
        })
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`"
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body",
        _ => "Failed to read request body",
    };

    ApiError::validation(vec![FieldError {
        field: "body".to_string(),
        message: message.to_string(),
    }])
    .with_detail(rejection.body_text())
}

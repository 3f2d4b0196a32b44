use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

use crate::api::errors::ApiError;
use crate::application::oauth::OAuthFlow;
use crate::domain::validation::UrlGuard;

pub const PKCE_COOKIE: &str = "pkce_verifier";
const PKCE_COOKIE_MAX_AGE_SECS: u32 = 600;

/// State shared by the login and callback routes
#[derive(Clone)]
pub struct OAuthState {
    pub flow: Arc<OAuthFlow>,
    pub frontend_origin: String,
    /// Adds `Secure` to the PKCE cookie
    pub secure_cookies: bool,
    /// Checks the final frontend redirect
    pub redirect_guard: Arc<UrlGuard>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    /// Authorization code issued by the provider
    pub code: Option<String>,
    pub state: Option<String>,
    /// Provider-side error such as `access_denied`
    pub error: Option<String>,
}

fn pkce_cookie(value: &str, max_age: u32, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        PKCE_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of the named cookie from any `Cookie` header
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// GET /api/v1/auth/oauth/login
#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/login",
    tag = "auth",
    responses(
        (status = 303, description = "Redirect to the identity provider; sets the pkce_verifier cookie"),
        (status = 500, description = "OAuth not configured or OAuth init failed")
    )
)]
pub async fn oauth_login_handler(State(state): State<OAuthState>) -> Result<Response, ApiError> {
    let start = state.flow.begin().map_err(ApiError::oauth_init)?;

    let cookie = pkce_cookie(
        &start.pkce_verifier,
        PKCE_COOKIE_MAX_AGE_SECS,
        state.secure_cookies,
    );

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(&start.authorization_url),
    )
        .into_response())
}

/// GET /api/v1/auth/oauth/callback
#[utoipa::path(
    get,
    path = "/api/v1/auth/oauth/callback",
    tag = "auth",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Redirect to the frontend with the session in the URL fragment"),
        (status = 400, description = "Missing authorization code or PKCE verifier"),
        (status = 500, description = "OAuth not configured or OAuth callback failed")
    )
)]
pub async fn oauth_callback_handler(
    State(state): State<OAuthState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(error) = query.error.as_deref() {
        warn!(provider_error = error, "Identity provider returned an error");
    }

    let verifier = read_cookie(&headers, PKCE_COOKIE);
    let session = state
        .flow
        .complete(query.code.as_deref(), verifier.as_deref())
        .await
        .map_err(ApiError::oauth_callback)?;

    let target = session.frontend_redirect(&state.frontend_origin);
    let target = state.redirect_guard.check(&target).map_err(|reason| {
        warn!(%reason, "Frontend redirect rejected");
        ApiError::internal_error("OAuth callback failed")
            .with_detail(format!("Frontend redirect rejected: {}", reason))
    })?;

    info!(user_id = %session.user.id(), role = %session.role().as_str(), "OAuth login completed");

    Ok((
        AppendHeaders([(header::SET_COOKIE, pkce_cookie("", 0, state.secure_cookies))]),
        Redirect::to(target.as_str()),
    )
        .into_response())
}

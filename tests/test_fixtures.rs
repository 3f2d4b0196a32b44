//! Shared test fixtures and utilities for all test types
//!
//! Everything runs against the in-memory repositories and a scripted
//! identity provider, so no database or network is needed.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use serde_json::Value;

use hospital_api::{
    api::create_router,
    application::{
        builder::ApplicationBuilder,
        ports::{
            AppointmentRepository, IdentityProvider, ProviderError, ProviderTokens,
            ProviderUserInfo, StaffRepository, UserRepository,
        },
    },
    infrastructure::persistence::{
        InMemoryAppointmentRepository, InMemoryStaffRepository, InMemoryUserRepository,
    },
    Config,
};

pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";
pub const STAFF_ID: &str = "507f1f77bcf86cd799439011";

/// Identity provider that maps authorization codes to canned profiles
#[derive(Default)]
pub struct FakeIdentityProvider {
    profiles: HashMap<String, ProviderUserInfo>,
    exchanged: Mutex<Vec<(String, String)>>,
}

impl FakeIdentityProvider {
    pub fn with_profile(mut self, code: &str, email: &str, name: &str) -> Self {
        self.profiles.insert(
            code.to_string(),
            ProviderUserInfo {
                email: Some(email.to_string()),
                name: Some(name.to_string()),
            },
        );
        self
    }

    /// (code, verifier) pairs seen by the token endpoint
    pub fn exchanged(&self) -> Vec<(String, String)> {
        self.exchanged.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<ProviderTokens, ProviderError> {
        self.exchanged
            .lock()
            .unwrap()
            .push((code.to_string(), code_verifier.to_string()));

        if self.profiles.contains_key(code) {
            Ok(ProviderTokens {
                access_token: format!("access-{}", code),
                id_token: None,
            })
        } else {
            Err(ProviderError::Rejected {
                status: 400,
                body: "invalid_grant".to_string(),
            })
        }
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<ProviderUserInfo, ProviderError> {
        let code = access_token.trim_start_matches("access-");
        self.profiles
            .get(code)
            .cloned()
            .ok_or_else(|| ProviderError::InvalidResponse("unknown token".to_string()))
    }
}

/// Test application with direct access to its repositories
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub staff: Arc<InMemoryStaffRepository>,
    pub appointments: Arc<InMemoryAppointmentRepository>,
    pub provider: Arc<FakeIdentityProvider>,
}

pub fn test_config(oauth_configured: bool) -> Config {
    Config::from_lookup(|key| match key {
        "FRONTEND_ORIGIN" => Some(FRONTEND_ORIGIN.to_string()),
        "OIDC_CLIENT_ID" if oauth_configured => Some("test-client".to_string()),
        "OIDC_CLIENT_SECRET" if oauth_configured => Some("test-secret".to_string()),
        "OIDC_REDIRECT_URI" if oauth_configured => {
            Some("http://localhost:3000/api/v1/auth/oauth/callback".to_string())
        }
        _ => None,
    })
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(FakeIdentityProvider::default(), true)
    }

    pub fn with_provider(provider: FakeIdentityProvider, oauth_configured: bool) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let staff = Arc::new(InMemoryStaffRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let provider = Arc::new(provider);

        let state = ApplicationBuilder::new(test_config(oauth_configured))
            .with_repositories(
                Arc::clone(&users) as Arc<dyn UserRepository>,
                Arc::clone(&staff) as Arc<dyn StaffRepository>,
                Arc::clone(&appointments) as Arc<dyn AppointmentRepository>,
            )
            .with_identity_provider(Arc::clone(&provider) as Arc<dyn IdentityProvider>)
            .with_infrastructure()
            .expect("Failed to initialize infrastructure")
            .build()
            .expect("Failed to build application state");

        Self {
            router: create_router(state),
            users,
            staff,
            appointments,
            provider,
        }
    }
}

/// HTTP test utilities
pub mod http {
    use super::*;
    use tower::ServiceExt;

    pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(data) => builder
                .header("content-type", "application/json")
                .body(Body::from(data.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
        request.headers_mut().insert(
            "authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        request
    }

    pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.unwrap()
    }

    pub async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn header(response: &Response<Body>, name: &str) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

/// Test data builders
pub mod data {
    use super::*;
    use serde_json::json;

    pub fn appointment_body() -> Value {
        json!({
            "patientName": "Jane Doe",
            "staffId": STAFF_ID,
            "date": "2026-03-14",
            "time": "09:30",
            "reason": "Annual checkup",
            "status": "Active"
        })
    }

    pub fn appointment_body_with(field: &str, value: Value) -> Value {
        let mut body = appointment_body();
        body[field] = value;
        body
    }
}

/// Assertion helpers
pub mod assertions {
    use super::*;

    /// Field names cited in a `Validation failed` body
    pub fn error_fields(body: &Value) -> Vec<String> {
        body["errors"]
            .as_array()
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

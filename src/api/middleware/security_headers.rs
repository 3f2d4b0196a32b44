use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Security headers configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityHeadersConfig {
    pub content_security_policy: Option<String>,
    /// Strict-Transport-Security max age in seconds; `None` disables HSTS
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: bool,
    pub x_frame_options: Option<String>,
    pub x_content_type_options: Option<String>,
    pub referrer_policy: Option<String>,
    pub permissions_policy: Option<String>,
    pub cross_origin_opener_policy: Option<String>,
    pub cross_origin_resource_policy: Option<String>,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            content_security_policy: Some(
                "default-src 'none'; frame-ancestors 'none'; base-uri 'none'".to_string(),
            ),
            hsts_max_age: Some(31_536_000),
            hsts_include_subdomains: true,
            x_frame_options: Some("DENY".to_string()),
            x_content_type_options: Some("nosniff".to_string()),
            referrer_policy: Some("no-referrer".to_string()),
            permissions_policy: Some("camera=(), microphone=(), geolocation=()".to_string()),
            cross_origin_opener_policy: Some("same-origin".to_string()),
            cross_origin_resource_policy: Some("same-origin".to_string()),
        }
    }
}

impl SecurityHeadersConfig {
    pub fn production() -> Self {
        Self::default()
    }

    /// HSTS off so local plain-HTTP runs are not pinned to TLS
    pub fn development() -> Self {
        Self {
            hsts_max_age: None,
            hsts_include_subdomains: false,
            ..Self::default()
        }
    }

    pub fn for_environment(production: bool) -> Self {
        if production {
            Self::production()
        } else {
            Self::development()
        }
    }

    fn header_pairs(&self) -> Vec<(HeaderName, String)> {
        let mut pairs = Vec::new();
        let mut push = |name: HeaderName, value: &Option<String>| {
            if let Some(v) = value {
                pairs.push((name, v.clone()));
            }
        };

        push(header::CONTENT_SECURITY_POLICY, &self.content_security_policy);
        push(header::X_FRAME_OPTIONS, &self.x_frame_options);
        push(header::X_CONTENT_TYPE_OPTIONS, &self.x_content_type_options);
        push(header::REFERRER_POLICY, &self.referrer_policy);
        push(
            HeaderName::from_static("permissions-policy"),
            &self.permissions_policy,
        );
        push(
            HeaderName::from_static("cross-origin-opener-policy"),
            &self.cross_origin_opener_policy,
        );
        push(
            HeaderName::from_static("cross-origin-resource-policy"),
            &self.cross_origin_resource_policy,
        );

        if let Some(max_age) = self.hsts_max_age {
            let mut hsts = format!("max-age={}", max_age);
            if self.hsts_include_subdomains {
                hsts.push_str("; includeSubDomains");
            }
            pairs.push((header::STRICT_TRANSPORT_SECURITY, hsts));
        }

        pairs
    }
}

/// Adds the configured security headers to every response
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in config.header_pairs() {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => warn!(header = %name, "Skipping invalid security header value"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn headers_for(config: SecurityHeadersConfig) -> axum::http::HeaderMap {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(
            middleware::from_fn_with_state(Arc::new(config), security_headers_middleware),
        );
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_production_headers() {
        let headers = headers_for(SecurityHeadersConfig::production()).await;
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(
            headers["strict-transport-security"],
            "max-age=31536000; includeSubDomains"
        );
        assert!(headers.contains_key("content-security-policy"));
        assert!(headers.contains_key("permissions-policy"));
    }

    #[tokio::test]
    async fn test_development_has_no_hsts() {
        let headers = headers_for(SecurityHeadersConfig::development()).await;
        assert!(!headers.contains_key("strict-transport-security"));
        assert_eq!(headers["referrer-policy"], "no-referrer");
    }

    #[test]
    fn test_for_environment() {
        assert!(SecurityHeadersConfig::for_environment(true).hsts_max_age.is_some());
        assert!(SecurityHeadersConfig::for_environment(false).hsts_max_age.is_none());
    }
}

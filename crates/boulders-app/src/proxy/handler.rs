//! Edge proxy request handling
//!
//! One call per incoming request, no state carried between calls. The
//! handler knows nothing about the HTTP framework in front of it: the edge
//! server converts to [`ProxyRequest`] and back from [`ProxyResponse`].

use std::sync::Arc;

use boulders_core::config::{CorsSettings, UpstreamSettings};
use boulders_core::ports::{UpstreamError, UpstreamPort, UpstreamRequest};
use boulders_core::proxy::{
    cors_headers, resolve_allowed_origin, security_headers, upstream_url, PathAllowList,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing path parameter")]
    MissingPath,

    #[error("path not allowed: {0}")]
    PathNotAllowed(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingPath => 400,
            ProxyError::PathNotAllowed(_) => 403,
            ProxyError::Upstream(_) => 500,
        }
    }
}

/// The parts of an incoming request the proxy looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyRequest {
    pub method: String,
    pub origin: Option<String>,
    /// Already URL-decoded `path` query parameter.
    pub path: Option<String>,
    pub accept_language: Option<String>,
    pub authorization: Option<String>,
    /// Raw request body bytes.
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    /// `None` only for preflight responses.
    pub body: Option<Value>,
}

pub struct ProxyRequestHandler {
    cors: CorsSettings,
    upstream_settings: UpstreamSettings,
    allow_list: PathAllowList,
    upstream: Arc<dyn UpstreamPort>,
}

impl ProxyRequestHandler {
    pub fn new(
        cors: CorsSettings,
        upstream_settings: UpstreamSettings,
        upstream: Arc<dyn UpstreamPort>,
    ) -> Self {
        Self {
            cors,
            upstream_settings,
            allow_list: PathAllowList::default(),
            upstream,
        }
    }

    pub fn with_allow_list(mut self, allow_list: PathAllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Never fails: every failure becomes a JSON error response.
    pub async fn handle(&self, request: ProxyRequest) -> ProxyResponse {
        let allowed_origin = resolve_allowed_origin(request.origin.as_deref(), &self.cors);

        if request.method.eq_ignore_ascii_case("OPTIONS") {
            return ProxyResponse {
                status: 200,
                headers: cors_headers(&allowed_origin),
                body: None,
            };
        }

        let (status, body) = match self.forward(request).await {
            Ok(result) => result,
            Err(e) => {
                let status = e.status_code();
                if status >= 500 {
                    error!(error = %e, "proxy request failed");
                } else {
                    warn!(error = %e, status, "proxy request rejected");
                }
                (status, json!({ "error": e.to_string() }))
            }
        };

        let mut headers = cors_headers(&allowed_origin);
        headers.extend(security_headers());
        ProxyResponse {
            status,
            headers,
            body: Some(body),
        }
    }

    async fn forward(&self, request: ProxyRequest) -> Result<(u16, Value), ProxyError> {
        let path = request
            .path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ProxyError::MissingPath)?;
        if !self.allow_list.is_allowed(path) {
            return Err(ProxyError::PathNotAllowed(path.to_string()));
        }

        let url = upstream_url(path, &self.upstream_settings);
        let method = request.method.to_ascii_uppercase();

        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            (
                "Accept-Language".to_string(),
                request
                    .accept_language
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| self.upstream_settings.default_locale.clone()),
            ),
        ];
        if let Some(authorization) = request.authorization.filter(|v| !v.trim().is_empty()) {
            headers.push(("Authorization".to_string(), authorization));
        }

        let body = match method.as_str() {
            "POST" | "PUT" | "PATCH" => request.body,
            _ => None,
        };

        debug!(%method, %url, "forwarding proxied request");
        let response = self
            .upstream
            .forward(UpstreamRequest {
                method,
                url,
                headers,
                body,
            })
            .await?;

        let body = serde_json::from_str(&response.body).unwrap_or(Value::String(response.body));
        Ok((response.status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockUpstream;
    use boulders_core::ports::UpstreamResponse;

    fn handler(upstream: MockUpstream) -> ProxyRequestHandler {
        ProxyRequestHandler::new(
            CorsSettings::default(),
            UpstreamSettings::default(),
            Arc::new(upstream),
        )
    }

    fn get(path: &str) -> ProxyRequest {
        ProxyRequest {
            method: "GET".into(),
            path: Some(path.into()),
            ..Default::default()
        }
    }

    fn header<'a>(response: &'a ProxyResponse, name: &str) -> Option<&'a str> {
        response
            .headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn expect_url(expected: &'static str) -> MockUpstream {
        let mut upstream = MockUpstream::new();
        upstream
            .expect_forward()
            .withf(move |req| req.url == expected)
            .times(1)
            .returning(|_| {
                Ok(UpstreamResponse {
                    status: 200,
                    body: r#"{"ok":true}"#.into(),
                })
            });
        upstream
    }

    #[tokio::test]
    async fn preflight_never_reaches_upstream() {
        let mut upstream = MockUpstream::new();
        upstream.expect_forward().never();

        let response = handler(upstream)
            .handle(ProxyRequest {
                method: "OPTIONS".into(),
                origin: Some("https://feature-x--boulders.netlify.app".into()),
                path: Some("/unknown/x".into()),
                ..Default::default()
            })
            .await;

        assert_eq!(response.status, 200);
        assert_eq!(response.body, None);
        assert_eq!(
            header(&response, "access-control-allow-origin"),
            Some("https://feature-x--boulders.netlify.app")
        );
        assert_eq!(header(&response, "x-frame-options"), None);
    }

    #[tokio::test]
    async fn reference_path_goes_to_the_public_host_unchanged() {
        let response = handler(expect_url("https://api-join.boulders.dk/api/reference/foo"))
            .handle(get("/api/reference/foo"))
            .await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn versioned_services_path_is_kept_verbatim_on_the_internal_host() {
        let response = handler(expect_url(
            "https://boulders.brpsystems.com/apiserver/api/ver3/services/x",
        ))
        .handle(get("/api/ver3/services/x"))
        .await;
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn bare_services_and_version_paths_are_normalized() {
        handler(expect_url(
            "https://boulders.brpsystems.com/apiserver/api/ver3/services/x",
        ))
        .handle(get("/services/x"))
        .await;
        handler(expect_url(
            "https://boulders.brpsystems.com/apiserver/api/ver3/businessunits",
        ))
        .handle(get("/ver3/businessunits"))
        .await;
    }

    #[tokio::test]
    async fn unknown_path_is_forbidden_without_upstream_call() {
        let mut upstream = MockUpstream::new();
        upstream.expect_forward().never();

        let response = handler(upstream).handle(get("/unknown/x")).await;

        assert_eq!(response.status, 403);
        assert_eq!(header(&response, "x-content-type-options"), Some("nosniff"));
        assert_eq!(
            header(&response, "access-control-allow-origin"),
            Some("https://join.boulders.dk")
        );
    }

    #[tokio::test]
    async fn missing_path_is_a_bad_request() {
        let mut upstream = MockUpstream::new();
        upstream.expect_forward().never();
        let handler = handler(upstream);

        for path in [None, Some("  ".to_string())] {
            let response = handler
                .handle(ProxyRequest {
                    method: "GET".into(),
                    path,
                    ..Default::default()
                })
                .await;
            assert_eq!(response.status, 400);
            assert!(response.body.unwrap()["error"].is_string());
        }
    }

    #[tokio::test]
    async fn headers_default_and_body_only_for_writes() {
        let mut upstream = MockUpstream::new();
        upstream
            .expect_forward()
            .withf(|req| {
                req.method == "DELETE"
                    && req.body.is_none()
                    && req.headers.contains(&("Accept-Language".into(), "da-DK".into()))
                    && req.headers.contains(&("Content-Type".into(), "application/json".into()))
                    && !req.headers.iter().any(|(n, _)| n == "Authorization")
            })
            .times(1)
            .returning(|_| Ok(UpstreamResponse { status: 204, body: String::new() }));
        upstream
            .expect_forward()
            .withf(|req| {
                req.method == "PATCH"
                    && req.body.as_deref() == Some(b"raw text, not json".as_slice())
                    && req.headers.contains(&("Accept-Language".into(), "en-GB".into()))
                    && req.headers.contains(&("Authorization".into(), "Bearer abc".into()))
            })
            .times(1)
            .returning(|_| Ok(UpstreamResponse { status: 200, body: "{}".into() }));
        let handler = handler(upstream);

        let response = handler
            .handle(ProxyRequest {
                method: "delete".into(),
                path: Some("/api/products/7".into()),
                body: Some(b"ignored".to_vec()),
                ..Default::default()
            })
            .await;
        assert_eq!(response.status, 204);

        handler
            .handle(ProxyRequest {
                method: "PATCH".into(),
                path: Some("/api/products/7".into()),
                accept_language: Some("en-GB".into()),
                authorization: Some("Bearer abc".into()),
                body: Some(b"raw text, not json".to_vec()),
                ..Default::default()
            })
            .await;
    }

    #[tokio::test]
    async fn non_utf8_body_is_forwarded_byte_for_byte() {
        const RAW: &[u8] = &[0xff, 0xfe, b'{', 0x80, b'}'];
        let mut upstream = MockUpstream::new();
        upstream
            .expect_forward()
            .withf(|req| req.body.as_deref() == Some(RAW))
            .times(1)
            .returning(|_| Ok(UpstreamResponse { status: 200, body: "{}".into() }));

        let response = handler(upstream)
            .handle(ProxyRequest {
                method: "POST".into(),
                path: Some("/api/ver3/services/orders".into()),
                body: Some(RAW.to_vec()),
                ..Default::default()
            })
            .await;
        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn non_json_upstream_body_is_wrapped_as_a_string_with_its_status() {
        let mut upstream = MockUpstream::new();
        upstream.expect_forward().returning(|_| {
            Ok(UpstreamResponse {
                status: 502,
                body: "<html>Bad gateway</html>".into(),
            })
        });

        let response = handler(upstream).handle(get("/api/products/addons")).await;

        assert_eq!(response.status, 502);
        assert_eq!(response.body, Some(json!("<html>Bad gateway</html>")));
        assert_eq!(header(&response, "referrer-policy"), Some("strict-origin-when-cross-origin"));
    }

    #[tokio::test]
    async fn upstream_failure_becomes_a_500_json_body() {
        let mut upstream = MockUpstream::new();
        upstream
            .expect_forward()
            .returning(|_| Err(UpstreamError::Transport("connection reset".into())));

        let response = handler(upstream).handle(get("/api/products/addons")).await;

        assert_eq!(response.status, 500);
        let body = response.body.unwrap();
        assert!(body["error"].as_str().unwrap().contains("connection reset"));
    }
}

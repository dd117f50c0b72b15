//! JSON API client
//!
//! Resolves every path against the [`ApiBase`] chosen at start-up, sends JSON
//! with a default `Accept-Language`, and attaches the stored bearer token
//! unless the caller already supplied credentials.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use boulders_core::api::{ApiBase, HttpError};
use boulders_core::ports::AccessTokenPort;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ApiClient {
    http: reqwest::Client,
    base: ApiBase,
    default_locale: String,
    tokens: Option<Arc<dyn AccessTokenPort>>,
}

impl ApiClient {
    pub fn new(base: ApiBase, default_locale: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(http, base, default_locale))
    }

    pub fn with_client(
        http: reqwest::Client,
        base: ApiBase,
        default_locale: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base,
            default_locale: default_locale.into(),
            tokens: None,
        }
    }

    /// Attach the source of bearer tokens for outgoing requests.
    pub fn with_access_tokens(mut self, tokens: Arc<dyn AccessTokenPort>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub async fn get(&self, path: &str) -> Result<Value, HttpError> {
        self.request(Method::GET, path, None, &[]).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpError> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    /// Send one request. `headers` override the defaults by name.
    ///
    /// Successful responses are returned as parsed JSON without unwrapping
    /// any envelope; an empty body reads as `null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(&str, &str)],
    ) -> Result<Value, HttpError> {
        let url = self.base.url_for(path);
        let headers = self.build_headers(headers);

        let mut builder = self.http.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        debug!(%method, %url, "api request");
        let response = builder.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "api request failed without response");
            HttpError::Network {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| HttpError::Network {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            debug!(%method, %url, status = status.as_u16(), "api request rejected");
            let data = serde_json::from_str(&text)
                .unwrap_or_else(|_| Value::Object(Default::default()));
            return Err(HttpError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                data,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| HttpError::InvalidBody {
            status: status.as_u16(),
            message: e.to_string(),
        })
    }

    fn build_headers(&self, overrides: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(locale) = HeaderValue::from_str(&self.default_locale) {
            headers.insert(ACCEPT_LANGUAGE, locale);
        }

        for (name, value) in overrides {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "skipping invalid request header"),
            }
        }

        if !headers.contains_key(AUTHORIZATION) {
            let token = self.tokens.as_ref().and_then(|tokens| tokens.access_token());
            if let Some(token) = token {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(value) => {
                        headers.insert(AUTHORIZATION, value);
                    }
                    Err(_) => warn!("stored access token is not a valid header value"),
                }
            }
        }

        headers
    }
}

//! Outbound leg of the edge proxy.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use boulders_core::ports::{UpstreamError, UpstreamPort, UpstreamRequest, UpstreamResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use tracing::debug;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(25);

pub struct ReqwestUpstream {
    http: reqwest::Client,
}

impl ReqwestUpstream {
    /// Idle connections are not kept between proxied requests.
    pub fn new() -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, UpstreamError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| UpstreamError::InvalidRequest(format!("header {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| UpstreamError::InvalidRequest(format!("header {name}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl UpstreamPort for ReqwestUpstream {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;
        let headers = header_map(&request.headers)?;

        let mut builder = self.http.request(method, &request.url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;

        debug!(url = %request.url, status, "upstream responded");
        Ok(UpstreamResponse { status, body })
    }
}

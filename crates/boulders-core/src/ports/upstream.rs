use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Sent as-is, without re-encoding.
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    #[error("upstream unreachable: {0}")]
    Transport(String),

    #[error("failed to read upstream body: {0}")]
    Body(String),
}

/// Performs the single outbound call of a proxied request.
#[async_trait]
pub trait UpstreamPort: Send + Sync {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

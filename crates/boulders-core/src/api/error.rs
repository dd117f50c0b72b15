use serde_json::Value;
use thiserror::Error;

/// Failure of an HTTP call made through the API client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HttpError {
    /// The server answered with a non-2xx status. `data` is the parsed error
    /// body, or an empty object when the body was not JSON.
    #[error("HTTP {status} {status_text}")]
    Status {
        status: u16,
        status_text: String,
        data: Value,
    },

    /// A 2xx response whose body was not the expected JSON.
    #[error("invalid response body (HTTP {status}): {message}")]
    InvalidBody { status: u16, message: String },

    /// No response was received at all.
    #[error("network error: {message}")]
    Network { message: String },
}

impl HttpError {
    /// HTTP status, or 0 for network failures.
    pub fn status(&self) -> u16 {
        match self {
            HttpError::Status { status, .. } | HttpError::InvalidBody { status, .. } => *status,
            HttpError::Network { .. } => 0,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            HttpError::Status { data, .. } => Some(data),
            HttpError::InvalidBody { .. } | HttpError::Network { .. } => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, HttpError::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn network_error_reports_status_zero() {
        let err = HttpError::Network {
            message: "connection refused".into(),
        };
        assert_eq!(err.status(), 0);
        assert!(err.is_network());
        assert!(err.data().is_none());
    }

    #[test]
    fn status_error_exposes_body() {
        let err = HttpError::Status {
            status: 422,
            status_text: "Unprocessable Entity".into(),
            data: json!({"message": "email taken"}),
        };
        assert_eq!(err.status(), 422);
        assert_eq!(err.data().unwrap()["message"], "email taken");
        assert_eq!(err.to_string(), "HTTP 422 Unprocessable Entity");
    }
}

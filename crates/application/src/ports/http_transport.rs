//! HTTP transport port

use async_trait::async_trait;
use hirelink_domain::request::ApiRequest;
use hirelink_domain::response::RawResponse;
use thiserror::Error;

/// Errors raised while performing an HTTP call.
///
/// `Clone` because one failure is handed to every caller sharing a
/// deduplicated request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The call exceeded its deadline and was aborted.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The deadline that fired.
        timeout_ms: u64,
    },

    /// DNS resolution failed.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed or dropped.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body text, for diagnostics.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Decode(String),

    /// The call was cancelled.
    #[error("request cancelled")]
    Cancelled,

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns true for failures below HTTP: the request never got a
    /// response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::DnsError { .. } | Self::ConnectionRefused { .. } | Self::ConnectionFailed(_)
        )
    }

    /// Returns the status code for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for sending requests to the marketplace API.
///
/// Implementations resolve `request.endpoint` against their base URL,
/// attach the bearer token and JSON body, and return the raw response
/// whatever its status. Status handling, decoding and retries happen in
/// the application layer.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends one request.
    ///
    /// # Errors
    ///
    /// Returns an error if no response was received: network failure,
    /// timeout, or an invalid URL or body.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, HttpClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_message() {
        let error = HttpClientError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP error! status: 503");
        assert_eq!(error.status(), Some(503));
    }

    #[test]
    fn test_network_classification() {
        assert!(HttpClientError::ConnectionFailed("reset".to_string()).is_network());
        assert!(!HttpClientError::Timeout { timeout_ms: 10 }.is_network());
        assert!(!HttpClientError::Decode("eof".to_string()).is_network());
    }
}

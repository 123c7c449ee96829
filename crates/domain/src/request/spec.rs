//! Request specification type

use std::time::Duration;

use serde_json::Value;

use super::{HttpMethod, QueryParams};
use crate::auth::AuthToken;
use crate::error::{DomainError, DomainResult};
use crate::id::generate_request_id;

/// Default deadline for read requests.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deadline for write requests.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(15);

/// A single call against the marketplace API.
///
/// `endpoint` is relative to the configured base URL (for example
/// `/jobs/42`). The body, when present, is already in wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Correlation ID used in logs.
    pub id: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path, rooted at `/`
    pub endpoint: String,
    /// Query parameters
    pub params: QueryParams,
    /// JSON body
    pub body: Option<Value>,
    /// Bearer token sent in the `Authorization` header
    pub bearer_token: Option<AuthToken>,
    /// Deadline for the whole call, retries included
    pub timeout: Duration,
}

impl ApiRequest {
    /// Creates a request with the default timeout for its method.
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        let timeout = if method.is_mutation() {
            DEFAULT_WRITE_TIMEOUT
        } else {
            DEFAULT_READ_TIMEOUT
        };
        Self {
            id: generate_request_id(),
            method,
            endpoint: endpoint.into(),
            params: QueryParams::new(),
            body: None,
            bearer_token: None,
            timeout,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: Option<AuthToken>) -> Self {
        self.bearer_token = token;
        self
    }

    /// Overrides the deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint followed by the serialized query string.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.params.is_empty() {
            self.endpoint.clone()
        } else {
            format!("{}?{}", self.endpoint, self.params.to_query_string())
        }
    }

    /// Returns the timeout in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Checks that the endpoint is a rooted path.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEndpoint` if the endpoint is empty,
    /// not rooted at `/`, or already carries a query string.
    pub fn validate(&self) -> DomainResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(DomainError::InvalidEndpoint("endpoint is required".to_string()));
        }
        if !self.endpoint.starts_with('/') {
            return Err(DomainError::InvalidEndpoint(format!(
                "endpoint must start with '/': {}",
                self.endpoint
            )));
        }
        if self.endpoint.contains('?') {
            return Err(DomainError::InvalidEndpoint(format!(
                "pass query parameters separately: {}",
                self.endpoint
            )));
        }
        Ok(())
    }
}

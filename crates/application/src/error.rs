//! Application error types

use hirelink_domain::DomainError;
use thiserror::Error;

use crate::ports::{HttpClientError, RealtimeError, StorageError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// A response did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// Persisting the session failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The real-time layer failed.
    #[error("realtime error: {0}")]
    Realtime(#[from] RealtimeError),
}

impl ApplicationError {
    /// Returns true if the backend rejected the bearer token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http(HttpClientError::Status { status: 401, .. }))
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

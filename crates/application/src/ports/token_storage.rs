//! Token storage port
//!
//! Persists the bearer token between runs, the way a browser client keeps
//! it in local storage.

use async_trait::async_trait;
use hirelink_domain::AuthToken;

/// Errors that can occur while persisting the token.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No storage location could be determined.
    #[error("no storage location: {0}")]
    Unavailable(String),
}

/// Repository trait for the persisted bearer token.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Loads the stored token, if any.
    ///
    /// # Errors
    /// Returns an error if stored data exists but cannot be read.
    async fn load(&self) -> Result<Option<AuthToken>, StorageError>;

    /// Stores the token, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the token cannot be written.
    async fn save(&self, token: &AuthToken) -> Result<(), StorageError>;

    /// Removes the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns an error if existing data cannot be removed.
    async fn clear(&self) -> Result<(), StorageError>;
}

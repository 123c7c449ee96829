//! File-based bearer token storage.
//!
//! The token is stored in `session.json` under the user data directory
//! (`~/.local/share/hirelink` on Linux) unless a path is configured:
//! ```json
//! {
//!   "saved_at": "2024-05-01T12:00:00Z",
//!   "schema_version": 1,
//!   "token": "1|hQ9..."
//! }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hirelink_application::ports::{StorageError, TokenStorage};
use hirelink_domain::AuthToken;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Default file name inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    saved_at: DateTime<Utc>,
    schema_version: u32,
    token: AuthToken,
}

/// Persists the bearer token as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates a storage backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a storage at the default location.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the platform has no data
    /// directory.
    pub fn at_default_location() -> Result<Self, StorageError> {
        Self::default_path().map(Self::new)
    }

    /// Returns `<data dir>/hirelink/session.json`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the platform has no data
    /// directory.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        dirs::data_dir()
            .map(|dir| dir.join("hirelink").join(SESSION_FILE_NAME))
            .ok_or_else(|| StorageError::Unavailable("no data directory".to_string()))
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    async fn restrict_permissions(&self) -> Result<(), StorageError> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unused_async)]
    async fn restrict_permissions(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<AuthToken>, StorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let stored: StoredSession = from_json_bytes(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if stored.schema_version != SCHEMA_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported schema version {}",
                stored.schema_version
            )));
        }

        debug!(path = %self.path.display(), saved_at = %stored.saved_at, "loaded token");
        Ok(Some(stored.token))
    }

    async fn save(&self, token: &AuthToken) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = to_json_stable_bytes(&StoredSession {
            saved_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
            token: token.clone(),
        })
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

        fs::write(&self.path, content).await?;
        self.restrict_permissions().await?;
        debug!(path = %self.path.display(), "saved token");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

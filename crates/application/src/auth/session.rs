//! Thread-safe session holder with token persistence.
//!
//! Every request reads the bearer token from here, so reads are
//! synchronous and never wait on storage I/O.

use std::sync::Arc;

use hirelink_domain::models::User;
use hirelink_domain::{AuthToken, Session};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::ports::{StorageError, TokenStorage};

/// The current signed-in state, shared by every API call.
pub struct AuthSession {
    state: RwLock<Option<Session>>,
    storage: Option<Arc<dyn TokenStorage>>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("status", &self.status())
            .field("persistent", &self.storage.is_some())
            .finish()
    }
}

impl AuthSession {
    /// Creates a session that lives only in memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
            storage: None,
        }
    }

    /// Creates a session whose token is persisted in `storage`.
    #[must_use]
    pub fn with_storage(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            state: RwLock::new(None),
            storage: Some(storage),
        }
    }

    /// Loads a persisted token, if any, without a user profile.
    ///
    /// Returns true if a token was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    pub async fn restore(&self) -> Result<bool, StorageError> {
        let Some(storage) = &self.storage else {
            return Ok(false);
        };
        let token = storage.load().await?;
        let found = token.is_some();
        *self.state.write() = token.map(Session::from_token);
        debug!(found, "restored session token");
        Ok(found)
    }

    /// Replaces the session and persists its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted; the in-memory
    /// session is set regardless.
    pub async fn sign_in(&self, session: Session) -> Result<(), StorageError> {
        let token = session.token.clone();
        let user_id = session.user.as_ref().map(|u| u.id);
        *self.state.write() = Some(session);
        info!(?user_id, "signed in");
        if let Some(storage) = &self.storage {
            storage.save(&token).await?;
        }
        Ok(())
    }

    /// Drops the session and its persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token cannot be removed; the
    /// in-memory session is cleared regardless.
    pub async fn sign_out(&self) -> Result<(), StorageError> {
        self.state.write().take();
        info!("signed out");
        if let Some(storage) = &self.storage {
            storage.clear().await?;
        }
        Ok(())
    }

    /// Attaches a freshly loaded profile to the current session.
    ///
    /// Does nothing when signed out.
    pub fn set_user(&self, user: User) {
        if let Some(session) = self.state.write().as_mut() {
            session.user = Some(user);
        }
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.state.read().as_ref().map(|s| s.token.clone())
    }

    /// Returns the signed-in user, once loaded.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state.read().as_ref().and_then(|s| s.user.clone())
    }

    /// Returns true if a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_some()
    }

    /// Returns a summary for display.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self.state.read().as_ref() {
            None => SessionStatus::SignedOut,
            Some(Session { user: None, .. }) => SessionStatus::TokenOnly,
            Some(Session { user: Some(user), .. }) => SessionStatus::SignedIn {
                user_id: user.id,
                name: user.name.clone(),
            },
        }
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token.
    SignedOut,
    /// A token is held but the profile has not been loaded.
    TokenOnly,
    /// Fully signed in.
    SignedIn {
        /// User ID.
        user_id: u64,
        /// Display name.
        name: String,
    },
}

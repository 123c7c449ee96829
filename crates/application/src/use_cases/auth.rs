//! Sign-in, sign-up and session restore.

use hirelink_domain::models::User;
use hirelink_domain::request::QueryParams;
use hirelink_domain::{AuthResponse, Credentials, GetOptions, Registration, Session};
use tracing::{info, warn};

use super::{decode, encode};
use crate::api_service::ApiService;
use crate::error::ApplicationResult;
use crate::ports::HttpTransport;

/// Authentication calls. Successful calls update the shared session.
pub struct AuthApi<T> {
    api: ApiService<T>,
}

impl<T: HttpTransport + 'static> AuthApi<T> {
    /// Creates the API over a shared dispatcher.
    #[must_use]
    pub const fn new(api: ApiService<T>) -> Self {
        Self { api }
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    /// Returns an error if the credentials are rejected or the token
    /// cannot be persisted.
    pub async fn login(&self, credentials: &Credentials) -> ApplicationResult<User> {
        let value = self
            .api
            .post("/auth/login", Some(encode(credentials)?))
            .await?;
        self.start_session(decode(value)?).await
    }

    /// Creates an account and signs in.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the registration or the
    /// token cannot be persisted.
    pub async fn register(&self, registration: &Registration) -> ApplicationResult<User> {
        let value = self
            .api
            .post("/auth/register", Some(encode(registration)?))
            .await?;
        self.start_session(decode(value)?).await
    }

    async fn start_session(&self, response: AuthResponse) -> ApplicationResult<User> {
        let user = response.user.clone();
        // Cached reads belong to whoever was signed in before.
        self.api.clear_cache();
        self.api.session().sign_in(Session::from(response)).await?;
        Ok(user)
    }

    /// Signs out.
    ///
    /// The local session and the cache are cleared even when the backend
    /// call fails; that failure is only logged.
    ///
    /// # Errors
    /// Returns an error if the persisted token cannot be removed.
    pub async fn logout(&self) -> ApplicationResult<()> {
        if let Err(error) = self.api.post("/auth/logout", None).await {
            warn!(%error, "logout call failed, clearing local session anyway");
        }
        self.api.clear_cache();
        self.api.session().sign_out().await?;
        Ok(())
    }

    /// Restores a persisted session and loads its profile.
    ///
    /// Returns `None` when no token is stored or the backend no longer
    /// accepts it, in which case the stored token is discarded.
    ///
    /// # Errors
    /// Returns an error if storage fails or the profile call fails for a
    /// reason other than an expired token.
    pub async fn restore(&self) -> ApplicationResult<Option<User>> {
        let session = self.api.session();
        if !session.restore().await? {
            return Ok(None);
        }
        match self
            .api
            .get("/users/profile", QueryParams::new(), GetOptions::uncached())
            .await
        {
            Ok(value) => {
                let user: User = decode(value)?;
                session.set_user(user.clone());
                info!(user_id = user.id, "session restored");
                Ok(Some(user))
            }
            Err(error) if error.status() == Some(401) => {
                warn!("stored token rejected, signing out");
                session.sign_out().await?;
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Returns the signed-in user, if loaded.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.api.session().current_user()
    }
}

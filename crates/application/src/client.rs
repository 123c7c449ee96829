//! Facade grouping every resource API over one dispatcher.

use std::sync::Arc;

use crate::api_service::{ApiService, ServiceSettings};
use crate::auth::AuthSession;
use crate::ports::{Clock, HttpTransport};
use crate::realtime::BroadcastAuthorizer;
use crate::use_cases::{
    AuthApi, JobsApi, MessagesApi, NotificationsApi, PaymentsApi, ProfilesApi,
};

/// The marketplace client.
///
/// All APIs share one [`ApiService`], so a write through any of them
/// invalidates reads cached by the others.
pub struct MarketplaceClient<T> {
    api: ApiService<T>,
    /// Sign-in, sign-up, logout and restore.
    pub auth: AuthApi<T>,
    /// Job board.
    pub jobs: JobsApi<T>,
    /// Profiles and the artisan directory.
    pub profiles: ProfilesApi<T>,
    /// Direct messages.
    pub messages: MessagesApi<T>,
    /// Notification inbox.
    pub notifications: NotificationsApi<T>,
    /// Payments.
    pub payments: PaymentsApi<T>,
}

impl<T: HttpTransport + 'static> MarketplaceClient<T> {
    /// Builds a client over `transport`.
    pub fn new(
        transport: T,
        session: Arc<AuthSession>,
        clock: Arc<dyn Clock>,
        settings: ServiceSettings,
    ) -> Self {
        Self::from_service(ApiService::new(transport, session, clock, settings))
    }

    /// Builds a client over an existing dispatcher.
    #[must_use]
    pub fn from_service(api: ApiService<T>) -> Self {
        Self {
            auth: AuthApi::new(api.clone()),
            jobs: JobsApi::new(api.clone()),
            profiles: ProfilesApi::new(api.clone()),
            messages: MessagesApi::new(api.clone()),
            notifications: NotificationsApi::new(api.clone()),
            payments: PaymentsApi::new(api.clone()),
            api,
        }
    }

    /// Returns the shared dispatcher.
    #[must_use]
    pub const fn api(&self) -> &ApiService<T> {
        &self.api
    }

    /// Returns the shared session.
    #[must_use]
    pub fn session(&self) -> &Arc<AuthSession> {
        self.api.session()
    }

    /// Returns a channel authorizer backed by this client's dispatcher.
    #[must_use]
    pub fn channel_authorizer(&self, auth_endpoint: impl Into<String>) -> BroadcastAuthorizer<T> {
        BroadcastAuthorizer::new(self.api.clone(), auth_endpoint)
    }
}

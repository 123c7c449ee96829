//! Wiring of the concrete adapters into a client.

use std::sync::Arc;

use hirelink_application::ports::{HttpClientError, StorageError};
use hirelink_application::{AuthSession, LiveUpdates, MarketplaceClient, ServiceSettings};
use hirelink_domain::{ClientConfig, DomainError};
use thiserror::Error;
use tracing::debug;

use crate::adapters::{ReqwestTransport, SystemClock};
use crate::persistence::FileTokenStorage;
use crate::realtime::WebSocketConnector;

/// The client over the production adapters.
pub type HireLinkClient = MarketplaceClient<ReqwestTransport>;

/// Errors raised while assembling the client.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] DomainError),

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] HttpClientError),

    /// The token storage location is unusable.
    #[error("token storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// Builds a client with reqwest, the system clock and file token storage.
///
/// The session starts empty; call `client.auth.restore()` to pick up a
/// persisted token.
///
/// # Errors
///
/// Returns an error if the base URL is invalid, the HTTP client cannot be
/// built, or no token file location can be determined.
pub fn build_client(config: &ClientConfig) -> Result<HireLinkClient, BootstrapError> {
    config.validate()?;

    let storage = match &config.token_file {
        Some(path) => FileTokenStorage::new(path),
        None => FileTokenStorage::at_default_location()?,
    };
    debug!(token_file = %storage.path().display(), "token storage");

    let session = Arc::new(AuthSession::with_storage(Arc::new(storage)));
    let transport = ReqwestTransport::new(config.base_url()?)?;

    Ok(MarketplaceClient::new(
        transport,
        session,
        Arc::new(SystemClock::new()),
        ServiceSettings::from_config(config),
    ))
}

/// Builds the real-time subscriber for `client`, authorizing channels
/// through its dispatcher.
#[must_use]
pub fn build_live_updates(
    client: &HireLinkClient,
    config: &ClientConfig,
) -> LiveUpdates<WebSocketConnector> {
    let authorizer = client.channel_authorizer(config.realtime.auth_endpoint.clone());
    LiveUpdates::new(
        WebSocketConnector::new(config.realtime.clone()),
        Arc::clone(client.session()),
        Arc::new(authorizer),
    )
}

//! Real-time ports

use std::sync::Arc;

use async_trait::async_trait;
use hirelink_domain::{Channel, RealtimeEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Stream of decoded events. Unbounded: the broker sets the pace and
/// nothing is dropped.
pub type EventStream = mpsc::UnboundedReceiver<RealtimeEvent>;

/// Real-time errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// The configuration is unusable.
    #[error("invalid realtime configuration: {0}")]
    InvalidConfig(String),

    /// The socket could not be opened.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The broker did not complete its handshake.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// A private channel subscription was not authorized.
    #[error("authorization failed for {channel}: {message}")]
    Authorization {
        /// Channel name.
        channel: String,
        /// Reason.
        message: String,
    },

    /// A frame could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Subscribing requires a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,

    /// The connection closed.
    #[error("connection closed")]
    Closed,
}

/// Signs private channel subscriptions.
#[async_trait]
pub trait ChannelAuthorizer: Send + Sync {
    /// Returns the auth signature for subscribing `socket_id` to `channel`.
    ///
    /// # Errors
    /// Returns `RealtimeError::Authorization` if the backend refuses.
    async fn authorize(&self, socket_id: &str, channel: &Channel) -> Result<String, RealtimeError>;
}

/// Opens real-time connections.
#[async_trait]
pub trait RealtimeConnector: Send + Sync {
    /// Connects, subscribes to every channel and returns the event stream.
    ///
    /// The stream ends when the connection closes.
    ///
    /// # Errors
    /// Returns an error if connecting, the handshake or any subscription
    /// authorization fails.
    async fn connect(
        &self,
        channels: &[Channel],
        authorizer: Arc<dyn ChannelAuthorizer>,
    ) -> Result<EventStream, RealtimeError>;
}

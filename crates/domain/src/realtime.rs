//! Real-time channel types.
//!
//! The backend broadcasts over a Pusher-compatible WebSocket. Each user
//! has a private channel, and each job has one for status changes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DomainError, DomainResult};
use crate::models::RecordId;

/// Real-time connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket base URL (ws:// or wss://), without the `/app/...` path.
    #[serde(default = "default_ws_url")]
    pub url: String,
    /// Application key of the broadcaster.
    #[serde(default)]
    pub app_key: String,
    /// API endpoint that signs private channel subscriptions.
    #[serde(default = "default_auth_endpoint")]
    pub auth_endpoint: String,
    /// Connection timeout in seconds.
    #[serde(default = "default_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_ws_url(),
            app_key: String::new(),
            auth_endpoint: default_auth_endpoint(),
            connect_timeout_secs: default_timeout(),
        }
    }
}

fn default_ws_url() -> String {
    "ws://localhost:6001".to_string()
}

fn default_auth_endpoint() -> String {
    "/broadcasting/auth".to_string()
}

const fn default_timeout() -> u64 {
    30
}

impl RealtimeConfig {
    /// Create a configuration for the given broadcaster.
    #[must_use]
    pub fn new(url: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_key: app_key.into(),
            ..Default::default()
        }
    }

    /// Get the connect timeout as Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Full socket URL including the Pusher protocol query.
    #[must_use]
    pub fn socket_url(&self) -> String {
        format!(
            "{}/app/{}?protocol=7&client=hirelink-rust&version={}",
            self.url.trim_end_matches('/'),
            self.app_key,
            env!("CARGO_PKG_VERSION")
        )
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfig` when the URL scheme is not a
    /// WebSocket scheme or the app key is missing.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.url.starts_with("ws://") && !self.url.starts_with("wss://") {
            return Err(DomainError::InvalidConfig(format!(
                "realtime URL must start with ws:// or wss://: {}",
                self.url
            )));
        }
        if self.app_key.trim().is_empty() {
            return Err(DomainError::InvalidConfig(
                "realtime app key is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A private broadcast channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Messages and notifications addressed to one user.
    User(RecordId),
    /// Updates to one job.
    Job(RecordId),
}

impl Channel {
    /// Returns the channel name used on the wire.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::User(id) => format!("private-user.{id}"),
            Self::Job(id) => format!("private-job.{id}"),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Channel {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let parse_id = |raw: &str| {
            raw.parse::<RecordId>()
                .map_err(|_| DomainError::InvalidChannel(s.to_string()))
        };
        if let Some(id) = s.strip_prefix("private-user.") {
            return Ok(Self::User(parse_id(id)?));
        }
        if let Some(id) = s.strip_prefix("private-job.") {
            return Ok(Self::Job(parse_id(id)?));
        }
        Err(DomainError::InvalidChannel(s.to_string()))
    }
}

/// Kinds of broadcast events the client reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A direct message was sent to the user.
    MessageSent,
    /// A notification was created for the user.
    NotificationSent,
    /// A job changed.
    JobUpdated,
    /// Any other event name.
    Other(String),
}

impl EventKind {
    /// Parses a wire event name.
    ///
    /// Accepts the broadcast alias (`message.sent`), the alias with the
    /// leading dot listeners use (`.message.sent`) and the backend event
    /// class name (`App\Events\MessageSent`).
    #[must_use]
    pub fn from_wire(name: &str) -> Self {
        let name = name.strip_prefix('.').unwrap_or(name);
        let short = name.rsplit('\\').next().unwrap_or(name);
        match short {
            "message.sent" | "MessageSent" => Self::MessageSent,
            "notification.sent" | "NotificationSent" => Self::NotificationSent,
            "job.updated" | "JobUpdated" => Self::JobUpdated,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Returns the broadcast alias.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::MessageSent => "message.sent",
            Self::NotificationSent => "notification.sent",
            Self::JobUpdated => "job.updated",
            Self::Other(name) => name,
        }
    }
}

/// A decoded broadcast event.
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeEvent {
    /// Channel the event arrived on.
    pub channel: String,
    /// Event kind.
    pub kind: EventKind,
    /// Event payload.
    pub payload: Value,
}

impl RealtimeEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(channel: impl Into<String>, kind: EventKind, payload: Value) -> Self {
        Self {
            channel: channel.into(),
            kind,
            payload,
        }
    }

    /// Returns `payload[field]` when the payload wraps the record under
    /// that name, otherwise the whole payload.
    #[must_use]
    pub fn record(&self, field: &str) -> &Value {
        self.payload.get(field).unwrap_or(&self.payload)
    }

    /// Parses the channel name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChannel` for channels this client
    /// does not model.
    pub fn parsed_channel(&self) -> DomainResult<Channel> {
        self.channel.parse()
    }
}

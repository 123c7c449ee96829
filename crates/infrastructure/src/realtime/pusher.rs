//! Pusher protocol (v7) frames.
//!
//! Every frame is a JSON object with `event`, an optional `channel` and
//! `data`. Brokers usually send `data` as a JSON-encoded string; it is
//! decoded a second time when it parses.

use hirelink_application::ports::RealtimeError;
use hirelink_domain::{EventKind, RealtimeEvent};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Value,
}

/// A decoded server frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// First frame after connecting.
    ConnectionEstablished {
        /// Socket ID used to sign private subscriptions.
        socket_id: String,
        /// Seconds of silence after which the client should ping.
        activity_timeout: Option<u64>,
    },
    /// A subscription was accepted.
    SubscriptionSucceeded {
        /// Channel name.
        channel: String,
    },
    /// A subscription was refused.
    SubscriptionError {
        /// Channel name.
        channel: String,
        /// Reason given by the broker.
        message: String,
    },
    /// Keep-alive probe; answer with [`pong`].
    Ping,
    /// Answer to a client ping.
    Pong,
    /// Connection-level error.
    Error {
        /// Pusher error code.
        code: Option<u64>,
        /// Error message.
        message: String,
    },
    /// An application event on a channel.
    Event(RealtimeEvent),
}

/// Decodes one text frame.
///
/// # Errors
///
/// Returns `RealtimeError::Protocol` if the frame is not a Pusher frame.
pub fn decode(text: &str) -> Result<Frame, RealtimeError> {
    let raw: RawFrame = serde_json::from_str(text)
        .map_err(|e| RealtimeError::Protocol(format!("invalid frame: {e}")))?;
    let data = unwrap_data(raw.data);

    let frame = match raw.event.as_str() {
        "pusher:connection_established" => Frame::ConnectionEstablished {
            socket_id: data
                .get("socket_id")
                .and_then(Value::as_str)
                .ok_or_else(|| RealtimeError::Protocol("handshake without socket_id".to_string()))?
                .to_string(),
            activity_timeout: data.get("activity_timeout").and_then(Value::as_u64),
        },
        "pusher_internal:subscription_succeeded" => Frame::SubscriptionSucceeded {
            channel: raw.channel.unwrap_or_default(),
        },
        "pusher:subscription_error" => Frame::SubscriptionError {
            channel: raw.channel.unwrap_or_default(),
            message: data
                .get("error")
                .and_then(Value::as_str)
                .map_or_else(|| data.to_string(), str::to_string),
        },
        "pusher:ping" => Frame::Ping,
        "pusher:pong" => Frame::Pong,
        "pusher:error" => Frame::Error {
            code: data.get("code").and_then(Value::as_u64),
            message: data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        name if name.starts_with("pusher:") || name.starts_with("pusher_internal:") => {
            return Err(RealtimeError::Protocol(format!("unsupported frame {name}")));
        }
        name => {
            let channel = raw
                .channel
                .ok_or_else(|| RealtimeError::Protocol(format!("event {name} without channel")))?;
            Frame::Event(RealtimeEvent::new(channel, EventKind::from_wire(name), data))
        }
    };
    Ok(frame)
}

fn unwrap_data(data: Value) -> Value {
    match data {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

/// Encodes a subscription to `channel`, signed with `auth`.
#[must_use]
pub fn subscribe(channel: &str, auth: &str) -> String {
    json!({
        "event": "pusher:subscribe",
        "data": { "channel": channel, "auth": auth }
    })
    .to_string()
}

/// Encodes the answer to a server ping.
#[must_use]
pub fn pong() -> String {
    json!({ "event": "pusher:pong", "data": {} }).to_string()
}

/// Encodes a client ping.
#[must_use]
pub fn ping() -> String {
    json!({ "event": "pusher:ping", "data": {} }).to_string()
}

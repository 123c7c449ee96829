//! In-app notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An in-app notification.
///
/// IDs are strings because the backend stores notifications under UUIDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification ID
    pub id: String,
    /// Notification kind, e.g. `job_application`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Short heading
    #[serde(default)]
    pub title: Option<String>,
    /// Body text
    #[serde(default)]
    pub message: String,
    /// Kind-specific payload
    #[serde(default)]
    pub data: Value,
    /// Whether the user has seen it
    #[serde(default)]
    pub read: bool,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of the unread counter endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    /// Number of unread notifications
    pub count: u64,
}

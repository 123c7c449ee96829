//! Direct messages between users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordId, User};

/// A direct message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Record ID
    pub id: RecordId,
    /// Author
    pub sender_id: RecordId,
    /// Recipient
    pub receiver_id: RecordId,
    /// Job the message is about
    #[serde(default)]
    pub job_id: Option<RecordId>,
    /// Message text
    pub content: String,
    /// Whether the recipient has read it
    #[serde(default)]
    pub is_read: bool,
    /// Send time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A conversation summary for the inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// The other participant
    pub user: User,
    /// Most recent message
    #[serde(default)]
    pub last_message: Option<Message>,
    /// Messages not yet read by the current user
    #[serde(default)]
    pub unread_count: u64,
}

/// Payload for sending a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Recipient
    pub receiver_id: RecordId,
    /// Message text
    pub content: String,
    /// Job the message is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<RecordId>,
}

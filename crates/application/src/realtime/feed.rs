//! View state folded from real-time events.

use std::collections::BTreeMap;

use hirelink_domain::models::{Job, Message, Notification, RecordId};
use hirelink_domain::{EventKind, RealtimeEvent, camelize_keys};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Messages, notifications and job updates received so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveFeed {
    messages: Vec<Message>,
    notifications: Vec<Notification>,
    unread_notifications: u64,
    jobs: BTreeMap<RecordId, Job>,
}

impl LiveFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the unread counter from a value fetched over REST.
    #[must_use]
    pub const fn with_unread(mut self, unread: u64) -> Self {
        self.unread_notifications = unread;
        self
    }

    /// Applies one event. Returns false if the event was ignored: an
    /// unknown kind or a payload that does not decode.
    pub fn apply(&mut self, event: &RealtimeEvent) -> bool {
        match &event.kind {
            EventKind::MessageSent => Self::parse::<Message>(event, "message")
                .map(|message| self.messages.push(message))
                .is_some(),
            EventKind::NotificationSent => Self::parse::<Notification>(event, "notification")
                .map(|notification| {
                    if !notification.read {
                        self.unread_notifications += 1;
                    }
                    self.notifications.push(notification);
                })
                .is_some(),
            EventKind::JobUpdated => Self::parse::<Job>(event, "job")
                .map(|job| {
                    self.jobs.insert(job.id, job);
                })
                .is_some(),
            EventKind::Other(_) => false,
        }
    }

    fn parse<T: DeserializeOwned>(event: &RealtimeEvent, field: &str) -> Option<T> {
        let record = camelize_keys(event.record(field).clone());
        match serde_json::from_value(record) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(
                    channel = %event.channel,
                    kind = event.kind.as_wire(),
                    %error,
                    "dropping malformed event"
                );
                None
            }
        }
    }

    /// Messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Notifications in arrival order.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Unread notification count.
    #[must_use]
    pub const fn unread_notifications(&self) -> u64 {
        self.unread_notifications
    }

    /// Marks every notification as read locally.
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        self.unread_notifications = 0;
    }

    /// Latest version of a job seen on the feed.
    #[must_use]
    pub fn job(&self, id: RecordId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Every updated job, by ID.
    #[must_use]
    pub const fn jobs(&self) -> &BTreeMap<RecordId, Job> {
        &self.jobs
    }
}

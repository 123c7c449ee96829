//! Opens the signed-in user's real-time subscriptions.

use std::sync::Arc;

use hirelink_domain::Channel;
use hirelink_domain::models::RecordId;
use tracing::info;

use crate::auth::AuthSession;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{ChannelAuthorizer, EventStream, RealtimeConnector};

/// Subscribes the signed-in user to their private channel and to the
/// channels of the jobs they follow.
pub struct LiveUpdates<C> {
    connector: C,
    session: Arc<AuthSession>,
    authorizer: Arc<dyn ChannelAuthorizer>,
}

impl<C: RealtimeConnector> LiveUpdates<C> {
    /// Creates the subscriber.
    pub fn new(
        connector: C,
        session: Arc<AuthSession>,
        authorizer: Arc<dyn ChannelAuthorizer>,
    ) -> Self {
        Self {
            connector,
            session,
            authorizer,
        }
    }

    /// Returns the channels for the signed-in user and `jobs`.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotAuthenticated` if no user is loaded.
    pub fn channels(&self, jobs: &[RecordId]) -> ApplicationResult<Vec<Channel>> {
        let user = self
            .session
            .current_user()
            .ok_or(ApplicationError::NotAuthenticated)?;
        let mut channels = vec![Channel::User(user.id)];
        channels.extend(jobs.iter().copied().map(Channel::Job));
        Ok(channels)
    }

    /// Connects and returns the event stream.
    ///
    /// # Errors
    /// Returns an error if no user is loaded or the connection fails.
    pub async fn connect(&self, jobs: &[RecordId]) -> ApplicationResult<EventStream> {
        let channels = self.channels(jobs)?;
        let stream = self
            .connector
            .connect(&channels, Arc::clone(&self.authorizer))
            .await?;
        info!(channels = channels.len(), "subscribed to live updates");
        Ok(stream)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::RealtimeError;
    use async_trait::async_trait;
    use hirelink_domain::models::{User, UserRole};
    use hirelink_domain::{AuthToken, EventKind, RealtimeEvent, Session};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::sync::mpsc;

    struct FixedAuthorizer;

    #[async_trait]
    impl ChannelAuthorizer for FixedAuthorizer {
        async fn authorize(
            &self,
            socket_id: &str,
            channel: &Channel,
        ) -> Result<String, RealtimeError> {
            Ok(format!("{socket_id}:{}", channel.name()))
        }
    }

    #[derive(Default)]
    struct RecordingConnector {
        signatures: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RealtimeConnector for RecordingConnector {
        async fn connect(
            &self,
            channels: &[Channel],
            authorizer: Arc<dyn ChannelAuthorizer>,
        ) -> Result<EventStream, RealtimeError> {
            let (tx, rx) = mpsc::unbounded_channel();
            for channel in channels {
                let auth = authorizer.authorize("1.1", channel).await?;
                self.signatures.lock().push(auth);
                tx.send(RealtimeEvent::new(channel.name(), EventKind::JobUpdated, json!({})))
                    .map_err(|_| RealtimeError::Closed)?;
            }
            Ok(rx)
        }
    }

    async fn signed_in_session() -> Arc<AuthSession> {
        let session = Arc::new(AuthSession::new());
        let user = User {
            id: 12,
            name: "Bola".to_string(),
            email: "bola@example.com".to_string(),
            role: UserRole::Artisan,
            phone: None,
            avatar: None,
            location: None,
            bio: None,
            skills: vec!["carpentry".to_string()],
            hourly_rate: Some(20.0),
            rating: None,
            created_at: None,
        };
        session
            .sign_in(Session {
                token: AuthToken::new("t"),
                user: Some(user),
            })
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_connect_subscribes_user_and_jobs() {
        let connector = RecordingConnector::default();
        let live = LiveUpdates::new(
            connector,
            signed_in_session().await,
            Arc::new(FixedAuthorizer),
        );

        let mut stream = live.connect(&[3, 4]).await.unwrap();

        let mut channels = Vec::new();
        while let Some(event) = stream.recv().await {
            channels.push(event.channel);
        }
        assert_eq!(channels, vec!["private-user.12", "private-job.3", "private-job.4"]);
        assert_eq!(live.connector.signatures.lock()[0], "1.1:private-user.12");
    }

    #[tokio::test]
    async fn test_connect_requires_loaded_user() {
        let live = LiveUpdates::new(
            RecordingConnector::default(),
            Arc::new(AuthSession::new()),
            Arc::new(FixedAuthorizer),
        );

        assert!(matches!(
            live.connect(&[]).await,
            Err(ApplicationError::NotAuthenticated)
        ));
    }
}

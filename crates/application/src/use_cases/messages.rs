//! Direct messaging calls.

use hirelink_domain::GetOptions;
use hirelink_domain::models::{Conversation, Message, NewMessage, RecordId};
use hirelink_domain::request::QueryParams;

use super::{decode, encode};
use crate::api_service::ApiService;
use crate::error::ApplicationResult;
use crate::ports::HttpTransport;

/// Conversations between clients and artisans.
pub struct MessagesApi<T> {
    api: ApiService<T>,
}

impl<T: HttpTransport + 'static> MessagesApi<T> {
    /// Creates the API over a shared dispatcher.
    #[must_use]
    pub const fn new(api: ApiService<T>) -> Self {
        Self { api }
    }

    /// Lists the signed-in user's conversations.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn conversations(&self) -> ApplicationResult<Vec<Conversation>> {
        let value = self
            .api
            .get(
                "/messages/conversations",
                QueryParams::new(),
                GetOptions::default(),
            )
            .await?;
        decode(value)
    }

    /// Fetches the message thread with one user. Never cached.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn thread(&self, user_id: RecordId) -> ApplicationResult<Vec<Message>> {
        let value = self
            .api
            .get(
                &format!("/messages/{user_id}"),
                QueryParams::new(),
                GetOptions::uncached(),
            )
            .await?;
        decode(value)
    }

    /// Sends a message.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the message.
    pub async fn send(&self, message: &NewMessage) -> ApplicationResult<Message> {
        let value = self.api.post("/messages", Some(encode(message)?)).await?;
        decode(value)
    }

    /// Marks a message as read.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn mark_read(&self, id: RecordId) -> ApplicationResult<()> {
        self.api.put(&format!("/messages/{id}/read"), None).await?;
        Ok(())
    }
}

//! Notification inbox calls.

use std::time::Duration;

use hirelink_domain::GetOptions;
use hirelink_domain::models::{Notification, UnreadCount};
use hirelink_domain::request::QueryParams;

use super::decode;
use crate::api_service::ApiService;
use crate::error::ApplicationResult;
use crate::ports::HttpTransport;

/// The unread badge is polled often; keep it short-lived.
const UNREAD_COUNT_TTL: Duration = Duration::from_secs(30);

/// Reads and acknowledges notifications.
pub struct NotificationsApi<T> {
    api: ApiService<T>,
}

impl<T: HttpTransport + 'static> NotificationsApi<T> {
    /// Creates the API over a shared dispatcher.
    #[must_use]
    pub const fn new(api: ApiService<T>) -> Self {
        Self { api }
    }

    /// Lists the signed-in user's notifications.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn list(&self) -> ApplicationResult<Vec<Notification>> {
        let value = self
            .api
            .get("/notifications", QueryParams::new(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Returns the number of unread notifications.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn unread_count(&self) -> ApplicationResult<u64> {
        let value = self
            .api
            .get(
                "/notifications/unread-count",
                QueryParams::new(),
                GetOptions::default().with_ttl(UNREAD_COUNT_TTL),
            )
            .await?;
        let count: UnreadCount = decode(value)?;
        Ok(count.count)
    }

    /// Marks one notification as read.
    ///
    /// The write invalidates only keys containing its own path, so the
    /// list and counter are dropped explicitly.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn mark_read(&self, id: &str) -> ApplicationResult<()> {
        self.api
            .put(&format!("/notifications/{id}/read"), None)
            .await?;
        self.api.invalidate("/notifications");
        Ok(())
    }

    /// Marks every notification as read.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn mark_all_read(&self) -> ApplicationResult<()> {
        self.api.put("/notifications/read-all", None).await?;
        self.api.invalidate("/notifications");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api_service::tests::{MockTransport, service};
    use hirelink_domain::response::RawResponse;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_unread_count_accepts_envelope() {
        let transport = Arc::new(MockTransport::ok(json!({"data": {"count": 4}})));
        let notifications = NotificationsApi::new(service(&transport));

        assert_eq!(notifications.unread_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_mark_read_refreshes_counter() {
        let transport = Arc::new(
            MockTransport::ok(json!({"count": 0}))
                .then(Ok(RawResponse::json(200, &json!({"count": 1}))))
                .then(Ok(RawResponse::json(200, &json!({"success": true})))),
        );
        let notifications = NotificationsApi::new(service(&transport));

        assert_eq!(notifications.unread_count().await.unwrap(), 1);
        notifications.mark_read("9b1c").await.unwrap();
        assert_eq!(notifications.unread_count().await.unwrap(), 0);

        let endpoints: Vec<String> = transport
            .requests()
            .into_iter()
            .map(|r| r.endpoint)
            .collect();
        assert_eq!(
            endpoints,
            vec![
                "/notifications/unread-count",
                "/notifications/9b1c/read",
                "/notifications/unread-count"
            ]
        );
    }
}

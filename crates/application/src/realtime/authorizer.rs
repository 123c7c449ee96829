//! Private channel authorization through the REST backend.

use async_trait::async_trait;
use hirelink_domain::Channel;
use serde_json::json;
use tracing::debug;

use crate::api_service::ApiService;
use crate::ports::{ChannelAuthorizer, HttpTransport, RealtimeError};

/// Signs subscriptions by posting to the backend's broadcast auth
/// endpoint with the current bearer token.
pub struct BroadcastAuthorizer<T> {
    api: ApiService<T>,
    endpoint: String,
}

impl<T: HttpTransport + 'static> BroadcastAuthorizer<T> {
    /// Creates an authorizer posting to `endpoint`.
    pub fn new(api: ApiService<T>, endpoint: impl Into<String>) -> Self {
        Self {
            api,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl<T: HttpTransport + 'static> ChannelAuthorizer for BroadcastAuthorizer<T> {
    async fn authorize(&self, socket_id: &str, channel: &Channel) -> Result<String, RealtimeError> {
        if !self.api.session().is_authenticated() {
            return Err(RealtimeError::NotAuthenticated);
        }
        let channel_name = channel.name();
        let body = json!({ "socket_id": socket_id, "channel_name": channel_name });
        let response = self
            .api
            .post(&self.endpoint, Some(body))
            .await
            .map_err(|e| RealtimeError::Authorization {
                channel: channel_name.clone(),
                message: e.to_string(),
            })?;
        debug!(channel = %channel_name, "channel authorized");
        response
            .get("auth")
            .and_then(|auth| auth.as_str())
            .map(str::to_string)
            .ok_or_else(|| RealtimeError::Authorization {
                channel: channel_name,
                message: "response has no auth signature".to_string(),
            })
    }
}

//! Typed resource APIs over the shared dispatcher.

mod auth;
mod jobs;
mod messages;
mod notifications;
mod payments;
mod profiles;

pub use auth::AuthApi;
pub use jobs::JobsApi;
pub use messages::MessagesApi;
pub use notifications::NotificationsApi;
pub use payments::PaymentsApi;
pub use profiles::ProfilesApi;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApplicationError, ApplicationResult};

/// Decodes a response body, bare or wrapped in a `{"data": ...}` envelope.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> ApplicationResult<T> {
    match T::deserialize(&value) {
        Ok(decoded) => Ok(decoded),
        Err(bare) => match value {
            Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                T::deserialize(data).map_err(|e| ApplicationError::Decode(e.to_string()))
            }
            _ => Err(ApplicationError::Decode(bare.to_string())),
        },
    }
}

/// Encodes a request payload.
pub(crate) fn encode<B: Serialize>(body: &B) -> ApplicationResult<Value> {
    serde_json::to_value(body).map_err(|e| ApplicationError::Encode(e.to_string()))
}

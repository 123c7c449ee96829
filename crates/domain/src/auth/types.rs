//! Session and credential types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{User, UserRole};

/// An opaque bearer token issued by the backend.
///
/// `Debug` is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Creates a login payload.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
    /// Password confirmation, checked by the backend
    pub password_confirmation: String,
    /// Whether the account posts jobs or performs them
    pub role: UserRole,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Body returned by the login and registration endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: User,
    /// Token to send on subsequent requests
    pub token: AuthToken,
}

/// The signed-in state shared across the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Bearer token
    pub token: AuthToken,
    /// Profile of the signed-in user, once known
    pub user: Option<User>,
}

impl Session {
    /// Creates a session for a token whose user is not loaded yet.
    #[must_use]
    pub const fn from_token(token: AuthToken) -> Self {
        Self { token, user: None }
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user: Some(response.user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret-123");
        assert_eq!(format!("{token:?}"), "AuthToken(***)");
        assert_eq!(token.header_value(), "Bearer secret-123");
    }

    #[test]
    fn test_registration_wire_names() {
        let registration = Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "pw".to_string(),
            password_confirmation: "pw".to_string(),
            role: UserRole::Artisan,
            phone: None,
        };
        let json = serde_json::to_value(&registration).unwrap_or_default();
        assert_eq!(json["passwordConfirmation"], "pw");
        assert_eq!(json["role"], "artisan");
        assert!(json.get("phone").is_none());
    }
}

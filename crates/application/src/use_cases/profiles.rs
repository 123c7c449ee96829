//! Profile and artisan directory calls.

use hirelink_domain::GetOptions;
use hirelink_domain::models::{ArtisanFilters, ProfileUpdate, RecordId, User};
use hirelink_domain::request::QueryParams;

use super::{decode, encode};
use crate::api_service::ApiService;
use crate::error::ApplicationResult;
use crate::ports::HttpTransport;

/// Reads and edits user profiles.
pub struct ProfilesApi<T> {
    api: ApiService<T>,
}

impl<T: HttpTransport + 'static> ProfilesApi<T> {
    /// Creates the API over a shared dispatcher.
    #[must_use]
    pub const fn new(api: ApiService<T>) -> Self {
        Self { api }
    }

    /// Fetches the signed-in user's profile.
    ///
    /// # Errors
    /// Returns an error if the call fails; a 401 means the token is stale.
    pub async fn profile(&self) -> ApplicationResult<User> {
        let value = self
            .api
            .get("/users/profile", QueryParams::new(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Updates the signed-in user's profile and refreshes the session copy.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the update.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApplicationResult<User> {
        let value = self
            .api
            .put("/users/profile", Some(encode(update)?))
            .await?;
        let user: User = decode(value)?;
        self.api.session().set_user(user.clone());
        Ok(user)
    }

    /// Searches the artisan directory.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn artisans(&self, filters: &ArtisanFilters) -> ApplicationResult<Vec<User>> {
        let value = self
            .api
            .get("/users/artisans", filters.to_params(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Fetches one artisan's public profile.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn artisan(&self, id: RecordId) -> ApplicationResult<User> {
        let value = self
            .api
            .get(
                &format!("/users/artisans/{id}"),
                QueryParams::new(),
                GetOptions::default(),
            )
            .await?;
        decode(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api_service::tests::{MockTransport, service};
    use hirelink_domain::models::UserRole;
    use hirelink_domain::{AuthToken, Session};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_artisans_decodes_snake_case_payload() {
        let transport = Arc::new(MockTransport::ok(json!([{
            "id": 8,
            "name": "Amaka",
            "email": "amaka@example.com",
            "role": "artisan",
            "skills": ["plumbing"],
            "hourly_rate": 35.5
        }])));
        let profiles = ProfilesApi::new(service(&transport));

        let artisans = profiles
            .artisans(&ArtisanFilters {
                skill: Some("plumbing".to_string()),
                ..ArtisanFilters::default()
            })
            .await
            .unwrap();

        assert_eq!(artisans[0].role, UserRole::Artisan);
        assert_eq!(artisans[0].hourly_rate, Some(35.5));
        assert_eq!(
            transport.requests()[0].path_and_query(),
            "/users/artisans?skill=plumbing"
        );
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_session_user() {
        let transport = Arc::new(MockTransport::ok(json!({
            "id": 2,
            "name": "Tunde B.",
            "email": "tunde@example.com",
            "role": "client"
        })));
        let api = service(&transport);
        api.session()
            .sign_in(Session::from_token(AuthToken::new("t")))
            .await
            .unwrap();
        let profiles = ProfilesApi::new(api.clone());

        profiles
            .update_profile(&ProfileUpdate {
                name: Some("Tunde B.".to_string()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();

        assert_eq!(
            api.session().current_user().map(|u| u.name),
            Some("Tunde B.".to_string())
        );
    }
}

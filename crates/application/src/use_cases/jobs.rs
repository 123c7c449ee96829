//! Job board calls.

use hirelink_domain::GetOptions;
use hirelink_domain::models::{Job, JobApplication, JobDraft, JobFilters, NewJobApplication, RecordId};
use hirelink_domain::request::QueryParams;

use super::{decode, encode};
use crate::api_service::ApiService;
use crate::error::ApplicationResult;
use crate::ports::HttpTransport;

/// Lists, edits and applies to jobs.
pub struct JobsApi<T> {
    api: ApiService<T>,
}

impl<T: HttpTransport + 'static> JobsApi<T> {
    /// Creates the API over a shared dispatcher.
    #[must_use]
    pub const fn new(api: ApiService<T>) -> Self {
        Self { api }
    }

    /// Lists jobs matching `filters`.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is not a job list.
    pub async fn list(&self, filters: &JobFilters) -> ApplicationResult<Vec<Job>> {
        let value = self
            .api
            .get("/jobs", filters.to_params(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Fetches one job.
    ///
    /// # Errors
    /// Returns an error if the call fails or the job is malformed.
    pub async fn get(&self, id: RecordId) -> ApplicationResult<Job> {
        let value = self
            .api
            .get(&format!("/jobs/{id}"), QueryParams::new(), GetOptions::default())
            .await?;
        decode(value)
    }

    /// Posts a new job.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the draft.
    pub async fn create(&self, draft: &JobDraft) -> ApplicationResult<Job> {
        let value = self.api.post("/jobs", Some(encode(draft)?)).await?;
        decode(value)
    }

    /// Replaces a job's editable fields.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the update.
    pub async fn update(&self, id: RecordId, draft: &JobDraft) -> ApplicationResult<Job> {
        let value = self
            .api
            .put(&format!("/jobs/{id}"), Some(encode(draft)?))
            .await?;
        decode(value)
    }

    /// Deletes a job.
    ///
    /// # Errors
    /// Returns an error if the call fails.
    pub async fn delete(&self, id: RecordId) -> ApplicationResult<()> {
        self.api.delete(&format!("/jobs/{id}")).await?;
        Ok(())
    }

    /// Applies to a job as the signed-in artisan.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the application.
    pub async fn apply(
        &self,
        id: RecordId,
        application: &NewJobApplication,
    ) -> ApplicationResult<JobApplication> {
        let value = self
            .api
            .post(&format!("/jobs/{id}/apply"), Some(encode(application)?))
            .await?;
        decode(value)
    }

    /// Lists the applications received for a job.
    ///
    /// # Errors
    /// Returns an error if the call fails or the body is malformed.
    pub async fn applications(&self, id: RecordId) -> ApplicationResult<Vec<JobApplication>> {
        let value = self
            .api
            .get(
                &format!("/jobs/{id}/applications"),
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
    use hirelink_domain::models::JobStatus;
    use hirelink_domain::request::HttpMethod;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn job_json(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Retile bathroom",
            "description": "About 6 square meters",
            "status": "open",
            "client_id": 3,
            "created_at": "2024-05-01T09:30:00Z"
        })
    }

    #[tokio::test]
    async fn test_list_sends_filters_and_decodes() {
        let transport = Arc::new(MockTransport::ok(json!({"data": [job_json(1), job_json(2)]})));
        let jobs = JobsApi::new(service(&transport));

        let listed = jobs.list(&JobFilters::open()).await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].client_id, Some(3));
        assert_eq!(listed[1].status, JobStatus::Open);
        assert_eq!(transport.requests()[0].path_and_query(), "/jobs?status=open");
    }

    #[tokio::test]
    async fn test_apply_posts_snake_case_body() {
        let transport = Arc::new(MockTransport::ok(json!({
            "id": 10,
            "job_id": 4,
            "artisan_id": 8,
            "proposed_price": 120.0,
            "status": "pending"
        })));
        let jobs = JobsApi::new(service(&transport));

        let application = jobs
            .apply(
                4,
                &NewJobApplication {
                    message: Some("Available Monday".to_string()),
                    proposed_price: Some(120.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(application.job_id, 4);
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.endpoint, "/jobs/4/apply");
        assert_eq!(
            sent.body,
            Some(json!({"message": "Available Monday", "proposed_price": 120.0}))
        );
    }

    #[tokio::test]
    async fn test_update_invalidates_job_reads() {
        let transport = Arc::new(MockTransport::ok(job_json(5)));
        let api = service(&transport);
        let jobs = JobsApi::new(api.clone());

        jobs.get(5).await.unwrap();
        jobs.get(5).await.unwrap();
        assert_eq!(transport.calls(), 1);

        let draft = JobDraft {
            title: "Retile bathroom".to_string(),
            description: "About 8 square meters".to_string(),
            ..JobDraft::default()
        };
        jobs.update(5, &draft).await.unwrap();
        jobs.get(5).await.unwrap();

        assert_eq!(transport.calls(), 3);
    }
}

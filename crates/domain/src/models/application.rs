//! Artisan applications to jobs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Awaiting the client's decision.
    #[default]
    Pending,
    /// The artisan was hired.
    Accepted,
    /// The client declined.
    Rejected,
}

/// An artisan's application to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    /// Record ID
    pub id: RecordId,
    /// Job applied to
    pub job_id: RecordId,
    /// Applying artisan
    pub artisan_id: RecordId,
    /// Cover message
    #[serde(default)]
    pub message: Option<String>,
    /// Quoted price
    #[serde(default)]
    pub proposed_price: Option<f64>,
    /// Review state
    #[serde(default)]
    pub status: ApplicationStatus,
    /// Submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for applying to a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobApplication {
    /// Cover message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Quoted price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_price: Option<f64>,
}

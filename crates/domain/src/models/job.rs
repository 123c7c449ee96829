//! Jobs posted by clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::request::QueryParams;

/// Lifecycle of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepting applications.
    #[default]
    Open,
    /// An artisan has been hired.
    InProgress,
    /// Work is done.
    Completed,
    /// Withdrawn by the client.
    Cancelled,
}

impl JobStatus {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true once no further work happens on the job.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Record ID
    pub id: RecordId,
    /// Short summary
    pub title: String,
    /// Full description
    #[serde(default)]
    pub description: String,
    /// Trade category
    #[serde(default)]
    pub category: Option<String>,
    /// Offered budget
    #[serde(default)]
    pub budget: Option<f64>,
    /// Current status
    #[serde(default)]
    pub status: JobStatus,
    /// Free-form location
    #[serde(default)]
    pub location: Option<String>,
    /// Latitude, when geocoded
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude, when geocoded
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Posting client
    #[serde(default)]
    pub client_id: Option<RecordId>,
    /// Hired artisan
    #[serde(default)]
    pub artisan_id: Option<RecordId>,
    /// Requested completion date
    #[serde(default)]
    pub deadline: Option<String>,
    /// Posting time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    /// Short summary
    pub title: String,
    /// Full description
    pub description: String,
    /// Trade category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Offered budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Free-form location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Requested completion date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// New status, for updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

/// Filters for the job board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilters {
    /// Status to match
    pub status: Option<JobStatus>,
    /// Category to match
    pub category: Option<String>,
    /// Location to match
    pub location: Option<String>,
    /// Free-text search
    pub search: Option<String>,
    /// Page number, 1-based
    pub page: Option<u32>,
}

impl JobFilters {
    /// Filters for open jobs only.
    #[must_use]
    pub fn open() -> Self {
        Self {
            status: Some(JobStatus::Open),
            ..Self::default()
        }
    }

    /// Renders the filters as query parameters, skipping unset ones.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("status", self.status.map(JobStatus::as_str))
            .with_opt("category", self.category.as_deref())
            .with_opt("location", self.location.as_deref())
            .with_opt("search", self.search.as_deref())
            .with_opt("page", self.page)
    }
}

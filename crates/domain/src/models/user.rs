//! Users: clients, artisans and admins

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::request::QueryParams;

/// What an account does on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Posts jobs and hires artisans.
    #[default]
    Client,
    /// Performs trade work and applies to jobs.
    Artisan,
    /// Moderates the marketplace.
    Admin,
}

/// A marketplace account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Record ID
    pub id: RecordId,
    /// Display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account role
    #[serde(default)]
    pub role: UserRole,
    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Free-form location
    #[serde(default)]
    pub location: Option<String>,
    /// Profile text
    #[serde(default)]
    pub bio: Option<String>,
    /// Trades an artisan offers
    #[serde(default)]
    pub skills: Vec<String>,
    /// Artisan hourly rate
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    /// Average review score
    #[serde(default)]
    pub rating: Option<f64>,
    /// Account creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns true for artisan accounts.
    #[must_use]
    pub fn is_artisan(&self) -> bool {
        self.role == UserRole::Artisan
    }
}

/// Partial profile update; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Profile text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Replaces the skill list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Artisan hourly rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
}

/// Filters for the artisan directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtisanFilters {
    /// Trade to match
    pub skill: Option<String>,
    /// Location to match
    pub location: Option<String>,
    /// Free-text search
    pub search: Option<String>,
    /// Page number, 1-based
    pub page: Option<u32>,
}

impl ArtisanFilters {
    /// Renders the filters as query parameters, skipping unset ones.
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("skill", self.skill.as_deref())
            .with_opt("location", self.location.as_deref())
            .with_opt("search", self.search.as_deref())
            .with_opt("page", self.page)
    }
}

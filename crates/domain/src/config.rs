//! Client configuration
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration pointing at a local backend.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::cache::DEFAULT_CACHE_TTL;
use crate::error::{DomainError, DomainResult};
use crate::realtime::RealtimeConfig;

/// How failed attempts are classified as worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Network failures, plus any error whose message contains the
    /// character `5`. Meant to catch 5xx statuses, but also matches
    /// e.g. `405` or a decode error at column 5.
    #[default]
    MessageHeuristic,
    /// Network failures and 5xx statuses only.
    ServerStatus,
}

impl FromStr for RetryMode {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "message_heuristic" | "heuristic" => Ok(Self::MessageHeuristic),
            "server_status" | "status" => Ok(Self::ServerStatus),
            other => Err(DomainError::InvalidConfig(format!("unknown retry mode: {other}"))),
        }
    }
}

/// Retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Error classification.
    #[serde(default)]
    pub mode: RetryMode,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            mode: RetryMode::default(),
        }
    }
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// REST API base URL; endpoints are appended to it.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Deadline for reads, in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Deadline for writes, in seconds.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_secs: u64,
    /// Lifetime of cached reads, in minutes.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_minutes: u64,
    /// Retry settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Rename payload keys between snake_case and camelCase.
    #[serde(default = "default_true")]
    pub transform_keys: bool,
    /// Where the bearer token is persisted; `None` uses the platform
    /// data directory.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// Real-time channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            read_timeout_secs: default_read_timeout(),
            write_timeout_secs: default_write_timeout(),
            cache_ttl_minutes: default_cache_ttl(),
            retry: RetryConfig::default(),
            transform_keys: true,
            token_file: None,
            realtime: RealtimeConfig::default(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

const fn default_read_timeout() -> u64 {
    10
}

const fn default_write_timeout() -> u64 {
    15
}

const fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL.as_secs() / 60
}

const fn default_true() -> bool {
    true
}

impl ClientConfig {
    /// Creates a configuration for the given API base URL.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        }
    }

    /// Read deadline.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Write deadline.
    #[must_use]
    pub const fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// Cache entry lifetime. Absurdly large values saturate.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_minutes.saturating_mul(60))
    }

    /// Parses the API base URL.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBaseUrl` if the URL does not parse or
    /// is not http(s).
    pub fn base_url(&self) -> DomainResult<Url> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| DomainError::InvalidBaseUrl(format!("{e}: {}", self.api_base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidBaseUrl(format!(
                "URL must start with http:// or https://: {}",
                self.api_base_url
            )));
        }
        Ok(url)
    }

    /// Validates the REST settings.
    ///
    /// The real-time section is validated separately, when a connection
    /// is opened.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` naming the first invalid field.
    pub fn validate(&self) -> DomainResult<()> {
        self.base_url()?;
        if self.read_timeout_secs == 0 || self.write_timeout_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

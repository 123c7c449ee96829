//! Cache keys and per-call cache options

use std::fmt;
use std::time::Duration;

use crate::request::{ApiRequest, QueryParams};

/// Default lifetime of a cached read.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Composite key of an endpoint and its serialized query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds the key for an endpoint and its parameters.
    #[must_use]
    pub fn new(endpoint: &str, params: &QueryParams) -> Self {
        if params.is_empty() {
            Self(endpoint.to_string())
        } else {
            Self(format!("{endpoint}?{}", params.to_query_string()))
        }
    }

    /// Builds the key for a request.
    #[must_use]
    pub fn for_request(request: &ApiRequest) -> Self {
        Self::new(&request.endpoint, &request.params)
    }

    /// Returns the key as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the key contains `pattern` anywhere.
    ///
    /// This is a plain substring test: `/jobs` also matches
    /// `/users/jobs` and `/jobs-archive`.
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options for a cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    /// Serve from and store into the cache.
    pub cache: bool,
    /// Entry lifetime; `None` uses the client default.
    pub ttl: Option<Duration>,
    /// Call deadline; `None` uses the client read timeout.
    pub timeout: Option<Duration>,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            cache: true,
            ttl: None,
            timeout: None,
        }
    }
}

impl GetOptions {
    /// Options that bypass the cache entirely.
    #[must_use]
    pub const fn uncached() -> Self {
        Self {
            cache: false,
            ttl: None,
            timeout: None,
        }
    }

    /// Sets the entry lifetime.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the entry lifetime in minutes.
    #[must_use]
    pub const fn ttl_minutes(self, minutes: u64) -> Self {
        self.with_ttl(Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Sets the call deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_without_params() {
        assert_eq!(CacheKey::new("/jobs", &QueryParams::new()).as_str(), "/jobs");
    }

    #[test]
    fn test_key_with_params() {
        let params = QueryParams::new().with("page", 2).with("status", "open");
        assert_eq!(
            CacheKey::new("/jobs", &params).as_str(),
            "/jobs?page=2&status=open"
        );
    }

    #[test]
    fn test_param_order_changes_key() {
        let a = QueryParams::new().with("a", 1).with("b", 2);
        let b = QueryParams::new().with("b", 2).with("a", 1);
        assert_ne!(CacheKey::new("/jobs", &a), CacheKey::new("/jobs", &b));
    }

    #[test]
    fn test_contains_is_substring() {
        let key = CacheKey::new("/users/jobs", &QueryParams::new());
        assert!(key.contains("/jobs"));
        assert!(!key.contains("/payments"));
    }

    #[test]
    fn test_ttl_minutes() {
        assert_eq!(
            GetOptions::default().ttl_minutes(2).ttl,
            Some(Duration::from_secs(120))
        );
        assert!(!GetOptions::uncached().cache);
    }

    #[test]
    fn test_ttl_minutes_saturates() {
        assert_eq!(
            GetOptions::default().ttl_minutes(u64::MAX).ttl,
            Some(Duration::from_secs(u64::MAX))
        );
    }
}

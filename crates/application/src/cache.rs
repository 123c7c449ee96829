//! In-memory response cache with per-entry TTL.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hirelink_domain::CacheKey;
use serde_json::Value;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    /// Fresh while no more than `ttl` has elapsed. A clock that went
    /// backwards counts as fresh.
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        (now - self.stored_at)
            .to_std()
            .map_or(true, |elapsed| elapsed <= self.ttl)
    }
}

/// Parsed response bodies keyed by endpoint and params.
///
/// There is no size bound; entries leave on expiry, invalidation or
/// `clear`.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResponseCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value if it is still fresh. A stale entry is
    /// removed.
    pub fn get(&mut self, key: &CacheKey, now: DateTime<Utc>) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a value, replacing any previous entry for the key.
    pub fn insert(&mut self, key: CacheKey, value: Value, ttl: Duration, now: DateTime<Utc>) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    /// Removes every entry whose key contains `pattern` and returns how
    /// many were removed.
    pub fn invalidate_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        before - self.entries.len()
    }

    /// Removes expired entries and returns how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before - self.entries.len()
    }

    /// Removes everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the stored keys, fresh or not, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.keys().cloned().collect()
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use hirelink_domain::request::QueryParams;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key(endpoint: &str) -> CacheKey {
        CacheKey::new(endpoint, &QueryParams::new())
    }

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_fresh_until_ttl_elapses() {
        let mut cache = ResponseCache::new();
        let t0 = Utc::now();
        cache.insert(key("/jobs"), json!([1]), TTL, t0);

        assert_eq!(cache.get(&key("/jobs"), t0 + TimeDelta::seconds(300)), Some(json!([1])));
        assert_eq!(cache.get(&key("/jobs"), t0 + TimeDelta::seconds(301)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_matching_is_substring() {
        let mut cache = ResponseCache::new();
        let now = Utc::now();
        cache.insert(key("/jobs"), json!(1), TTL, now);
        cache.insert(key("/jobs/7"), json!(2), TTL, now);
        cache.insert(key("/users/jobs"), json!(3), TTL, now);
        cache.insert(key("/users/artisans"), json!(4), TTL, now);

        assert_eq!(cache.invalidate_matching("/jobs"), 3);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&key("/users/artisans"), now).is_some());
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = ResponseCache::new();
        let now = Utc::now();
        cache.insert(key("/a"), json!(1), Duration::from_secs(10), now);
        cache.insert(key("/b"), json!(2), Duration::from_secs(100), now);

        assert_eq!(cache.purge_expired(now + TimeDelta::seconds(50)), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clock_going_backwards_keeps_entry() {
        let mut cache = ResponseCache::new();
        let now = Utc::now();
        cache.insert(key("/a"), json!(1), TTL, now);
        assert!(cache.get(&key("/a"), now - TimeDelta::seconds(5)).is_some());
    }
}

//! Retry with exponential backoff.

use std::future::Future;
use std::time::Duration;

use hirelink_domain::{RetryConfig, RetryMode};
use tracing::warn;

use crate::ports::HttpClientError;

/// How many times, how long apart, and for which errors a call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Error classification.
    pub mode: RetryMode,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(RetryConfig::default())
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
            mode: config.mode,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
            mode: RetryMode::ServerStatus,
        }
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }

    /// Returns true if the failed attempt should be retried.
    ///
    /// Timeouts and cancellations never are; the caller's deadline has
    /// already passed or the caller gave up.
    #[must_use]
    pub fn is_retriable(&self, error: &HttpClientError) -> bool {
        match error {
            HttpClientError::Timeout { .. } | HttpClientError::Cancelled => false,
            e if e.is_network() => true,
            e => match self.mode {
                RetryMode::MessageHeuristic => e.to_string().contains('5'),
                RetryMode::ServerStatus => e.status().is_some_and(|s| (500..600).contains(&s)),
            },
        }
    }

    /// Runs `operation` until it succeeds, fails terminally, or the
    /// retries are used up. The closure receives the 0-based attempt.
    ///
    /// # Errors
    ///
    /// Returns the last error seen.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, HttpClientError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, HttpClientError>>,
    {
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_retries && self.is_retriable(&error) => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        %error,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn status(code: u16) -> HttpClientError {
        HttpClientError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_heuristic_matches_any_five() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retriable(&status(503)));
        assert!(policy.is_retriable(&status(405)));
        assert!(!policy.is_retriable(&status(404)));
        assert!(policy.is_retriable(&HttpClientError::Decode("line 1 column 5".to_string())));
        assert!(policy.is_retriable(&HttpClientError::ConnectionFailed("reset".to_string())));
    }

    #[test]
    fn test_timeouts_are_terminal() {
        let policy = RetryPolicy::default();
        assert!(!policy.is_retriable(&HttpClientError::Timeout { timeout_ms: 15_000 }));
        assert!(!policy.is_retriable(&HttpClientError::Cancelled));
    }

    #[test]
    fn test_server_status_mode() {
        let policy = RetryPolicy {
            mode: RetryMode::ServerStatus,
            ..RetryPolicy::default()
        };
        assert!(policy.is_retriable(&status(502)));
        assert!(!policy.is_retriable(&status(405)));
        assert!(!policy.is_retriable(&HttpClientError::Decode("column 5".to_string())));
        assert!(policy.is_retriable(&HttpClientError::ConnectionRefused {
            host: "localhost".to_string(),
            port: 8000,
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::default()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(status(500)) }
            })
            .await;

        assert_eq!(result, Err(status(500)));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_terminal_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::default()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(status(404)) }
            })
            .await;

        assert_eq!(result, Err(status(404)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_recovers() {
        let result = RetryPolicy::default()
            .run(|attempt| async move {
                if attempt < 2 {
                    Err(status(503))
                } else {
                    Ok(attempt)
                }
            })
            .await;

        assert_eq!(result, Ok(2));
    }
}

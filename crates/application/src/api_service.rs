//! Request dispatcher with response caching, in-flight deduplication,
//! retries and per-call deadlines.
//!
//! Every REST call of the client goes through [`ApiService`]. Reads are
//! keyed by endpoint and query string; identical reads issued while one is
//! in flight share its future. Writes bypass the cache and, once they
//! succeed, drop every cached read whose key contains the written endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use hirelink_domain::request::{ApiRequest, HttpMethod, QueryParams};
use hirelink_domain::response::RawResponse;
use hirelink_domain::{CacheKey, ClientConfig, GetOptions, camelize_keys, snakify_keys};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::AuthSession;
use crate::cache::ResponseCache;
use crate::ports::{Clock, HttpClientError, HttpTransport};
use crate::retry::RetryPolicy;

type CallResult = Result<Value, HttpClientError>;
type SharedCall = Shared<BoxFuture<'static, CallResult>>;

/// Tunables of the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Deadline for reads.
    pub read_timeout: Duration,
    /// Deadline for writes.
    pub write_timeout: Duration,
    /// Lifetime of cached reads.
    pub cache_ttl: Duration,
    /// Retry behavior.
    pub retry: RetryPolicy,
    /// Camelize response keys and snakify request keys.
    pub transform_keys: bool,
}

impl ServiceSettings {
    /// Derives settings from the client configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
            cache_ttl: config.cache_ttl(),
            retry: RetryPolicy::from(config.retry),
            transform_keys: config.transform_keys,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[derive(Default)]
struct State {
    cache: ResponseCache,
    in_flight: HashMap<CacheKey, SharedCall>,
}

struct Inner<T> {
    transport: T,
    session: Arc<AuthSession>,
    clock: Arc<dyn Clock>,
    settings: ServiceSettings,
    state: Mutex<State>,
}

/// The cached, deduplicating, retrying REST dispatcher.
///
/// Cheap to clone; clones share the cache.
pub struct ApiService<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for ApiService<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for ApiService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("ApiService")
            .field("settings", &self.inner.settings)
            .field("cached", &state.cache.len())
            .field("in_flight", &state.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl<T: HttpTransport + 'static> ApiService<T> {
    /// Creates a dispatcher over `transport`.
    pub fn new(
        transport: T,
        session: Arc<AuthSession>,
        clock: Arc<dyn Clock>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                session,
                clock,
                settings,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Returns the auth session whose token is attached to requests.
    #[must_use]
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.inner.session
    }

    /// Returns the dispatcher settings.
    #[must_use]
    pub fn settings(&self) -> &ServiceSettings {
        &self.inner.settings
    }

    /// Reads `endpoint`, serving a fresh cached copy when allowed.
    ///
    /// Identical reads in flight are joined whatever `options.cache` says;
    /// the option only controls cache lookup and storage. The request runs
    /// on its own task, so dropping this future does not cancel it.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, decode or timeout error of the
    /// shared call.
    pub async fn get(
        &self,
        endpoint: &str,
        params: QueryParams,
        options: GetOptions,
    ) -> Result<Value, HttpClientError> {
        let key = CacheKey::new(endpoint, &params);
        let call = {
            let mut state = self.inner.state.lock();
            if options.cache
                && let Some(value) = state.cache.get(&key, self.inner.clock.now())
            {
                debug!(key = %key, "cache hit");
                return Ok(value);
            }
            if let Some(call) = state.in_flight.get(&key) {
                debug!(key = %key, "joining in-flight request");
                call.clone()
            } else {
                debug!(key = %key, cache = options.cache, "cache miss");
                let timeout = options.timeout.unwrap_or(self.inner.settings.read_timeout);
                let request = self
                    .build_request(HttpMethod::Get, endpoint, None)
                    .with_params(params)
                    .with_timeout(timeout);
                let ttl = options.ttl.unwrap_or(self.inner.settings.cache_ttl);
                let call = Self::shared_read(
                    Arc::clone(&self.inner),
                    key.clone(),
                    request,
                    options.cache,
                    ttl,
                );
                state.in_flight.insert(key, call.clone());
                call
            }
        };
        call.await
    }

    /// Spawns the read so it runs to completion, caches its result and
    /// leaves the in-flight map even when every caller has gone away.
    ///
    /// Must be called with the state lock held, before the returned call
    /// is inserted.
    fn shared_read(
        inner: Arc<Inner<T>>,
        key: CacheKey,
        request: ApiRequest,
        store: bool,
        ttl: Duration,
    ) -> SharedCall {
        let task = tokio::spawn(async move {
            let result = inner.execute(request).await;
            let mut state = inner.state.lock();
            state.in_flight.remove(&key);
            if store && let Ok(value) = &result {
                state.cache.insert(key, value.clone(), ttl, inner.clock.now());
            }
            drop(state);
            result
        });
        async move {
            task.await.unwrap_or_else(|error| {
                warn!(%error, "read task failed");
                Err(if error.is_cancelled() {
                    HttpClientError::Cancelled
                } else {
                    HttpClientError::Other(error.to_string())
                })
            })
        }
        .boxed()
        .shared()
    }

    /// Sends a POST.
    ///
    /// # Errors
    ///
    /// Returns the call error; the cache is untouched on failure.
    pub async fn post(
        &self,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, HttpClientError> {
        self.mutate(HttpMethod::Post, endpoint, body).await
    }

    /// Sends a PUT.
    ///
    /// # Errors
    ///
    /// Returns the call error; the cache is untouched on failure.
    pub async fn put(&self, endpoint: &str, body: Option<Value>) -> Result<Value, HttpClientError> {
        self.mutate(HttpMethod::Put, endpoint, body).await
    }

    /// Sends a PATCH.
    ///
    /// # Errors
    ///
    /// Returns the call error; the cache is untouched on failure.
    pub async fn patch(
        &self,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, HttpClientError> {
        self.mutate(HttpMethod::Patch, endpoint, body).await
    }

    /// Sends a DELETE.
    ///
    /// # Errors
    ///
    /// Returns the call error; the cache is untouched on failure.
    pub async fn delete(&self, endpoint: &str) -> Result<Value, HttpClientError> {
        self.mutate(HttpMethod::Delete, endpoint, None).await
    }

    async fn mutate(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<Value, HttpClientError> {
        let request = self
            .build_request(method, endpoint, body)
            .with_timeout(self.inner.settings.write_timeout);
        let value = self.inner.execute(request).await?;
        self.invalidate(endpoint);
        Ok(value)
    }

    /// Drops every cached read whose key contains `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let removed = self.inner.state.lock().cache.invalidate_matching(pattern);
        if removed > 0 {
            debug!(pattern, removed, "invalidated cache entries");
        }
        removed
    }

    /// Empties the cache. In-flight reads are unaffected.
    pub fn clear_cache(&self) {
        let mut state = self.inner.state.lock();
        let removed = state.cache.len();
        state.cache.clear();
        info!(removed, "cleared response cache");
    }

    /// Returns the keys of fresh cached reads, sorted.
    #[must_use]
    pub fn cached_entries(&self) -> Vec<CacheKey> {
        let now = self.inner.clock.now();
        let mut state = self.inner.state.lock();
        state.cache.purge_expired(now);
        let mut keys = state.cache.keys();
        keys.sort();
        keys
    }

    /// Returns the number of reads currently in flight.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.inner.state.lock().in_flight.len()
    }

    fn build_request(&self, method: HttpMethod, endpoint: &str, body: Option<Value>) -> ApiRequest {
        let body = if self.inner.settings.transform_keys {
            body.map(snakify_keys)
        } else {
            body
        };
        ApiRequest::new(method, endpoint)
            .with_body(body)
            .with_bearer_token(self.inner.session.token())
    }
}

impl<T: HttpTransport> Inner<T> {
    /// Runs the retry loop under the request deadline.
    async fn execute(&self, request: ApiRequest) -> CallResult {
        let timeout_ms = request.timeout_ms();
        let attempts = self.settings.retry.run(|attempt| self.attempt(&request, attempt));
        match tokio::time::timeout(request.timeout, attempts).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    request_id = %request.id,
                    method = %request.method,
                    endpoint = %request.endpoint,
                    timeout_ms,
                    "request timed out"
                );
                Err(HttpClientError::Timeout { timeout_ms })
            }
        }
    }

    async fn attempt(&self, request: &ApiRequest, attempt: u32) -> CallResult {
        debug!(
            request_id = %request.id,
            method = %request.method,
            path = %request.path_and_query(),
            attempt,
            "sending request"
        );
        let response = self.transport.send(request).await?;
        debug!(
            request_id = %request.id,
            status = %response.status,
            duration_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "received response"
        );
        self.decode(&response)
    }

    fn decode(&self, response: &RawResponse) -> CallResult {
        if !response.status.is_success() {
            return Err(HttpClientError::Status {
                status: response.status.as_u16(),
                body: response.body_text(),
            });
        }
        if response.is_empty() {
            return Ok(Value::Null);
        }
        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| HttpClientError::Decode(e.to_string()))?;
        Ok(if self.settings.transform_keys {
            camelize_keys(value)
        } else {
            value
        })
    }
}

//! Bounded exponential-backoff retries around the search backend.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::query::BackendQuery;
use crate::application::repos::{SearchBackend, SearchError};

const METRIC_SEARCH_RETRY: &str = "marquee_search_retry_total";
const METRIC_SEARCH_MS: &str = "marquee_search_ms";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 100;
const DEFAULT_JITTER_MS: u64 = 100;
// Caps the exponent so the delay arithmetic cannot overflow.
const MAX_BACKOFF_EXPONENT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the initial call included.
    pub max_attempts: NonZeroU32,
    pub base_delay: Duration,
    /// Upper bound of the random delay added to every backoff.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: NonZeroU32::new(DEFAULT_MAX_ATTEMPTS).unwrap_or(NonZeroU32::MIN),
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            jitter: Duration::from_millis(DEFAULT_JITTER_MS),
        }
    }
}

impl From<&crate::config::RetrySettings> for RetryPolicy {
    fn from(settings: &crate::config::RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: settings.base_delay,
            jitter: settings.jitter,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry that follows failed attempt `attempt` (0-based):
    /// `base_delay * 2^attempt` plus up to `jitter` of random spread.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u32 << attempt.min(MAX_BACKOFF_EXPONENT);
        let exponential = self.base_delay.saturating_mul(factor);
        exponential.saturating_add(self.random_jitter())
    }

    fn random_jitter(&self) -> Duration {
        let max_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// Search client that retries transient backend failures.
///
/// Not-found and malformed-query failures are returned on the first attempt.
/// When every attempt fails, the last error is returned unchanged.
#[derive(Clone)]
pub struct RetryingSearchClient {
    backend: Arc<dyn SearchBackend>,
    policy: RetryPolicy,
}

impl RetryingSearchClient {
    pub fn new(backend: Arc<dyn SearchBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn get(&self, index: &str, id: &str) -> Result<Value, SearchError> {
        self.with_retry("get", index, || self.backend.get(index, id))
            .await
    }

    pub async fn search(&self, index: &str, query: &BackendQuery) -> Result<Vec<Value>, SearchError> {
        self.with_retry("search", index, || self.backend.search(index, query))
            .await
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        index: &str,
        mut call: F,
    ) -> Result<T, SearchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SearchError>>,
    {
        let started_at = Instant::now();
        let max_attempts = self.policy.max_attempts.get();
        let mut attempt = 0_u32;

        loop {
            let result = call().await;
            attempt += 1;

            match result {
                Ok(value) => {
                    histogram!(METRIC_SEARCH_MS, "operation" => operation)
                        .record(started_at.elapsed().as_secs_f64() * 1000.0);
                    return Ok(value);
                }
                Err(error) if error.is_transient() && attempt < max_attempts => {
                    let delay = self.policy.backoff(attempt - 1);
                    warn!(
                        operation,
                        index,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "Search backend call failed; retrying"
                    );
                    counter!(METRIC_SEARCH_RETRY, "operation" => operation).increment(1);
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    debug!(operation, index, attempt, error = %error, "Search backend call failed");
                    return Err(error);
                }
            }
        }
    }
}

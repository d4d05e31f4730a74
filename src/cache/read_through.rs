//! Read-through cache in front of a value producer.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::debug;

use crate::application::codec::Codec;

use super::keys::CacheKey;
use super::store::{CacheError, CacheStore};

const METRIC_CACHE_HIT: &str = "marquee_cache_hit_total";
const METRIC_CACHE_MISS: &str = "marquee_cache_miss_total";
const METRIC_CACHE_STORE: &str = "marquee_cache_store_total";

/// Serves encoded values from a [`CacheStore`], computing and storing them on a miss.
///
/// Concurrent misses on one key are not coalesced: each computes and writes,
/// and the last write wins.
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ReadThroughCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the value cached under `key`, or compute, store and return it.
    ///
    /// A hit never invokes `compute`. Errors from `compute` are returned
    /// without caching anything. A payload that fails to decode is reported as
    /// [`CacheError::Decode`] rather than treated as a miss.
    pub async fn get_or_compute<T, C, F, Fut, E>(
        &self,
        key: &CacheKey,
        codec: &C,
        compute: F,
    ) -> Result<T, E>
    where
        C: Codec<T>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CacheError>,
    {
        if let Some(payload) = self.store.get(key.as_str()).await? {
            counter!(METRIC_CACHE_HIT).increment(1);
            debug!(key = %key, bytes = payload.len(), "Cache hit");
            return codec.decode(&payload).map_err(|source| {
                E::from(CacheError::Decode {
                    key: key.to_string(),
                    source,
                })
            });
        }

        counter!(METRIC_CACHE_MISS).increment(1);
        debug!(key = %key, "Cache miss");

        let value = compute().await?;
        let payload = codec.encode(&value).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key.as_str(), payload, self.ttl).await?;
        counter!(METRIC_CACHE_STORE).increment(1);

        Ok(value)
    }
}

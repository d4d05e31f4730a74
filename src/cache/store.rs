//! Cache store seam and the in-process implementation.

use std::sync::{LockResult, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use thiserror::Error;
use tokio::time::Instant;
use tracing::warn;

use crate::application::codec::CodecError;

use super::config::CacheConfig;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store error: {0}")]
    Store(String),
    #[error("failed to encode value for cache key `{key}`: {source}")]
    Encode { key: String, source: CodecError },
    #[error("corrupt cache payload under key `{key}`: {source}")]
    Decode { key: String, source: CodecError },
}

impl CacheError {
    pub fn store(err: impl std::fmt::Display) -> Self {
        Self::Store(err.to_string())
    }
}

/// Key-value store with per-entry expiry.
///
/// Single-key reads and writes are atomic; nothing else is assumed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Write `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;
}

struct MemoryEntry {
    payload: Bytes,
    /// `None` when the TTL reaches past the clock's range.
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| deadline > now)
    }
}

/// In-process store with LRU eviction and lazy expiry.
pub struct MemoryStore {
    entries: RwLock<LruCache<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.capacity_non_zero())),
        }
    }

    /// Number of entries held, expired ones included until they are read.
    pub fn len(&self) -> usize {
        recover(self.entries.read(), "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut entries = recover(self.entries.write(), "get");
        match entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_live(Instant::now()) => {
                return Ok(Some(entry.payload.clone()));
            }
            Some(_) => {}
        }
        entries.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            payload: value,
            expires_at: Instant::now().checked_add(ttl),
        };
        recover(self.entries.write(), "set").put(key.to_string(), entry);
        Ok(())
    }
}

fn recover<G>(result: LockResult<G>, op: &'static str) -> G {
    result.unwrap_or_else(|poisoned| {
        warn!(
            op,
            store = "memory",
            result = "poisoned_recovered",
            hint = "entries may be stale after panic in another thread",
            "Recovered from poisoned cache lock"
        );
        poisoned.into_inner()
    })
}

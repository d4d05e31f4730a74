//! Cache configuration.
//!
//! Controls the read-through cache via the `[cache]` section of `marquee.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use super::keys::ListKeyScope;

// Default values for cache configuration
const DEFAULT_TTL_SECS: u64 = 300;
const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Expiry applied uniformly to every entry.
    pub ttl: Duration,
    /// Maximum entries held by the in-process store.
    pub capacity: usize,
    /// Prefix list keys with the collection tag.
    pub scope_list_keys: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            capacity: DEFAULT_MEMORY_CAPACITY,
            scope_list_keys: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            ttl: settings.ttl,
            capacity: settings.capacity.get(),
            scope_list_keys: settings.scope_list_keys,
        }
    }
}

impl CacheConfig {
    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn list_key_scope(&self) -> ListKeyScope {
        if self.scope_list_keys {
            ListKeyScope::Collection
        } else {
            ListKeyScope::Legacy
        }
    }
}

//! Marquee cache layer
//!
//! Read-through caching of catalog reads in front of the search backend:
//!
//! - **Keys**: `{tag}:{id}` for scalar lookups, `{tag}-list:...` for list requests
//! - **Stores**: in-process LRU (`memory`) or Redis (`redis`), both with per-entry expiry
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `marquee.toml`:
//!
//! ```toml
//! [cache]
//! backend = "memory"
//! ttl_seconds = 300
//! capacity = 10000
//! scope_list_keys = true
//! ```

mod config;
mod keys;
mod read_through;
mod redis_store;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheKey, KeyDeriver, ListKeyScope};
pub use read_through::ReadThroughCache;
pub use redis_store::RedisStore;
pub use store::{CacheError, CacheStore, MemoryStore};

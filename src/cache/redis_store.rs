//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::info;

use super::store::{CacheError, CacheStore};

/// Cache store on a shared Redis connection; expiry is delegated to `SET ... EX`.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url).map_err(CacheError::store)?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(CacheError::store)?;
        info!(target = "marquee::cache", "Connected to Redis cache store");
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut connection = self.connection.clone();
        let payload: Option<Vec<u8>> = connection.get(key).await.map_err(CacheError::store)?;
        Ok(payload.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key, value.as_ref(), expiry_seconds(ttl))
            .await
            .map_err(CacheError::store)
    }
}

/// `EX` takes whole seconds and rejects zero.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

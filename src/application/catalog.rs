//! Entity services for the three catalog collections and their cached front.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::application::codec::{CodecError, JsonCodec};
use crate::application::collections::{Categories, Collection, Contributors, Works};
use crate::application::query::{self, ListRequest};
use crate::application::repos::{SearchBackend, SearchError};
use crate::application::retry::{RetryPolicy, RetryingSearchClient};
use crate::cache::{CacheConfig, CacheError, CacheStore, KeyDeriver, ReadThroughCache};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("document from index `{index}` does not match the entity shape: {source}")]
    Document {
        index: &'static str,
        #[source]
        source: CodecError,
    },
}

/// Uncached reads against one collection.
pub struct EntityService<C> {
    client: RetryingSearchClient,
    codec: JsonCodec,
    _collection: PhantomData<fn() -> C>,
}

impl<C> Clone for EntityService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            codec: self.codec,
            _collection: PhantomData,
        }
    }
}

impl<C: Collection> EntityService<C> {
    pub fn new(client: RetryingSearchClient) -> Self {
        Self {
            client,
            codec: JsonCodec,
            _collection: PhantomData,
        }
    }

    /// Fetch one entity; an absent document yields `None`.
    pub async fn get_by_id(&self, id: &C::Id) -> Result<Option<C::Entity>, CatalogError> {
        let id = id.to_string();
        match self.client.get(C::SPEC.index, &id).await {
            Ok(source) => self.decode(source).map(Some),
            Err(SearchError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// List entities in backend order. `None` lists the first page sorted by id.
    pub async fn list(
        &self,
        request: Option<&ListRequest<C::SortField>>,
    ) -> Result<Vec<C::Entity>, CatalogError> {
        let request = request.cloned().unwrap_or_default();
        let backend_query = query::build(&C::SPEC, &request);
        let hits = self.client.search(C::SPEC.index, &backend_query).await?;
        hits.into_iter().map(|source| self.decode(source)).collect()
    }

    fn decode(&self, source: Value) -> Result<C::Entity, CatalogError> {
        self.codec
            .decode_document(source)
            .map_err(|source| CatalogError::Document {
                index: C::SPEC.index,
                source,
            })
    }
}

/// [`EntityService`] behind the read-through cache.
pub struct CachedEntityService<C> {
    service: EntityService<C>,
    cache: ReadThroughCache,
    keys: KeyDeriver,
    codec: JsonCodec,
}

impl<C> Clone for CachedEntityService<C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            cache: self.cache.clone(),
            keys: self.keys,
            codec: self.codec,
        }
    }
}

impl<C: Collection> CachedEntityService<C> {
    pub fn new(service: EntityService<C>, cache: ReadThroughCache, keys: KeyDeriver) -> Self {
        Self {
            service,
            cache,
            keys,
            codec: JsonCodec,
        }
    }

    pub async fn get_by_id(&self, id: &C::Id) -> Result<Option<C::Entity>, CatalogError> {
        let key = self.keys.scalar(C::SPEC.key_tag, id);
        debug!(index = C::SPEC.index, key = %key, "Catalog get");
        self.cache
            .get_or_compute(&key, &self.codec, || self.service.get_by_id(id))
            .await
    }

    pub async fn list(
        &self,
        request: Option<&ListRequest<C::SortField>>,
    ) -> Result<Vec<C::Entity>, CatalogError> {
        let request = request.cloned().unwrap_or_default();
        let key = self.keys.list(C::SPEC.key_tag, &request);
        debug!(index = C::SPEC.index, key = %key, "Catalog list");
        self.cache
            .get_or_compute(&key, &self.codec, || self.service.list(Some(&request)))
            .await
    }
}

/// Cached services for every collection, sharing one backend and one store.
#[derive(Clone)]
pub struct Catalog {
    works: CachedEntityService<Works>,
    categories: CachedEntityService<Categories>,
    contributors: CachedEntityService<Contributors>,
}

impl Catalog {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        store: Arc<dyn CacheStore>,
        retry: RetryPolicy,
        cache: &CacheConfig,
    ) -> Self {
        let client = RetryingSearchClient::new(backend, retry);
        let read_through = ReadThroughCache::new(store, cache.ttl);
        let keys = KeyDeriver::new(cache.list_key_scope());

        Self {
            works: CachedEntityService::new(
                EntityService::new(client.clone()),
                read_through.clone(),
                keys,
            ),
            categories: CachedEntityService::new(
                EntityService::new(client.clone()),
                read_through.clone(),
                keys,
            ),
            contributors: CachedEntityService::new(
                EntityService::new(client),
                read_through,
                keys,
            ),
        }
    }

    pub fn works(&self) -> &CachedEntityService<Works> {
        &self.works
    }

    pub fn categories(&self) -> &CachedEntityService<Categories> {
        &self.categories
    }

    pub fn contributors(&self) -> &CachedEntityService<Contributors> {
        &self.contributors
    }
}

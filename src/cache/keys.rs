//! Cache key derivation.
//!
//! Scalar keys are `{tag}:{id}`. List keys render the request as
//! `{query}:{direction}:{field}:{page}:{page_size}`, prefixed with `{tag}-list:`
//! unless the legacy unscoped layout is configured. Scalar keys always start
//! with `{tag}:`, so no identifier can produce a scoped list key.

use std::fmt;

use crate::application::query::ListRequest;
use crate::domain::types::SortField;

/// Opaque cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether list keys carry the collection tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListKeyScope {
    #[default]
    Collection,
    /// Unscoped layout: identical requests against different collections share a key.
    Legacy,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDeriver {
    scope: ListKeyScope,
}

impl KeyDeriver {
    pub fn new(scope: ListKeyScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> ListKeyScope {
        self.scope
    }

    pub fn scalar(&self, tag: &str, id: &(impl fmt::Display + ?Sized)) -> CacheKey {
        CacheKey(format!("{tag}:{id}"))
    }

    pub fn list<S: SortField>(&self, tag: &str, request: &ListRequest<S>) -> CacheKey {
        let body = format!(
            "{}:{}:{}:{}:{}",
            request.query.as_deref().unwrap_or_default(),
            request.direction.as_str().to_ascii_lowercase(),
            request.sort.as_str().to_ascii_lowercase(),
            request.page,
            request.page_size,
        );
        match self.scope {
            ListKeyScope::Collection => CacheKey(format!("{tag}-list:{body}")),
            ListKeyScope::Legacy => CacheKey(body),
        }
    }
}

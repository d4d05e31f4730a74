//! Search backend trait describing the document-store adapter.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::application::query::BackendQuery;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("document not found")]
    NotFound,
    #[error("search backend unavailable: {0}")]
    Transient(String),
    #[error("malformed query: {message}")]
    MalformedQuery { message: String },
    #[error("invalid backend response: {message}")]
    InvalidResponse { message: String },
}

impl SearchError {
    pub fn transient(err: impl std::fmt::Display) -> Self {
        Self::Transient(err.to_string())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedQuery {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Only network and backend-availability failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::Transient(_))
    }
}

/// Read access to the document-search engine.
///
/// Implementations return raw document sources; decoding into entities is the
/// caller's concern.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch one document source by id, or [`SearchError::NotFound`].
    async fn get(&self, index: &str, id: &str) -> Result<Value, SearchError>;

    /// Run a query and return the hit sources in backend order.
    async fn search(&self, index: &str, query: &BackendQuery) -> Result<Vec<Value>, SearchError>;
}

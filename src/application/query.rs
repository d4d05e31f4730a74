//! Translation of logical list requests into backend search queries.

use std::fmt;

use crate::application::collections::CollectionSpec;
use crate::domain::types::{SortDirection, SortField};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Edit distance tolerated by the fuzzy match clause.
pub const FUZZINESS: u8 = 1;

/// A read request against one collection.
///
/// `page` and `page_size` are expected to be at least 1; the request boundary
/// validates them before they reach this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest<S> {
    pub query: Option<String>,
    pub sort: S,
    pub direction: SortDirection,
    pub page: u32,
    pub page_size: u32,
}

impl<S: SortField> Default for ListRequest<S> {
    fn default() -> Self {
        Self {
            query: None,
            sort: S::default(),
            direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<S: SortField> ListRequest<S> {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// The free-text query, if it is non-empty.
    pub fn search_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    pub field: String,
    pub direction: SortDirection,
}

impl fmt::Display for SortClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Multi-field fuzzy match with per-field boosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchClause {
    pub query: String,
    pub fields: Vec<String>,
    pub fuzziness: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendQuery {
    pub projection: Vec<&'static str>,
    pub sort: Vec<SortClause>,
    pub from: u64,
    pub size: u32,
    pub query: Option<MatchClause>,
}

/// Sort clause for `field`, rewritten to the untokenized `.raw` sub-field for
/// text fields so ordering is lexicographic on the exact string.
pub fn sort_clause<S: SortField>(field: S, direction: SortDirection) -> SortClause {
    let document_field = field.document_field();
    let field = if field.is_text() {
        format!("{document_field}.raw")
    } else {
        document_field.to_string()
    };
    SortClause { field, direction }
}

pub fn build<S: SortField>(spec: &CollectionSpec, request: &ListRequest<S>) -> BackendQuery {
    let query = request.search_text().map(|text| MatchClause {
        query: text.to_string(),
        fields: spec.fuzzy_fields.iter().map(|field| field.render()).collect(),
        fuzziness: FUZZINESS,
    });

    BackendQuery {
        projection: spec.projection.to_vec(),
        sort: vec![sort_clause(request.sort, request.direction)],
        from: request.offset(),
        size: request.page_size,
        query,
    }
}

//! Elasticsearch adapter for [`SearchBackend`] over the REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::application::query::BackendQuery;
use crate::application::repos::{SearchBackend, SearchError};
use crate::config::SearchSettings;

use super::error::InfraError;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct DocumentResponse {
    found: bool,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct ElasticsearchBackend {
    client: Client,
    base: Url,
}

impl ElasticsearchBackend {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, InfraError> {
        if base.cannot_be_a_base() {
            return Err(InfraError::search_backend(format!(
                "search url `{base}` cannot carry a path"
            )));
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|err| InfraError::search_backend(err.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn from_settings(settings: &SearchSettings) -> Result<Self, InfraError> {
        Self::new(settings.url.clone(), settings.timeout)
    }

    pub fn user_agent() -> &'static str {
        concat!("marquee/", env!("CARGO_PKG_VERSION"))
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SearchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| SearchError::malformed("search url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    async fn get(&self, index: &str, id: &str) -> Result<Value, SearchError> {
        let url = self.url(&[index, "_doc", id])?;
        debug!(target = "marquee::search", %url, "GET document");

        let resp = self.client.get(url).send().await.map_err(send_failure)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(SearchError::transient)?;

        if status == StatusCode::NOT_FOUND {
            return Err(missing_document(&bytes));
        }
        if !status.is_success() {
            return Err(status_failure(status, &bytes));
        }

        let document: DocumentResponse = parse_envelope(&bytes)?;
        match (document.found, document.source) {
            (true, Some(source)) => Ok(source),
            (true, None) => Err(SearchError::invalid_response("document without _source")),
            (false, _) => Err(SearchError::NotFound),
        }
    }

    async fn search(&self, index: &str, query: &BackendQuery) -> Result<Vec<Value>, SearchError> {
        let url = self.url(&[index, "_search"])?;
        let body = search_body(query);
        debug!(target = "marquee::search", %url, body = %body, "POST search");

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(send_failure)?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(SearchError::transient)?;

        if !status.is_success() {
            return Err(status_failure(status, &bytes));
        }

        let response: SearchResponse = parse_envelope(&bytes)?;
        Ok(response.hits.hits.into_iter().map(|hit| hit.source).collect())
    }
}

/// Render the `_search` request body.
pub fn search_body(query: &BackendQuery) -> Value {
    let sort: Vec<Value> = query
        .sort
        .iter()
        .map(|clause| {
            let mut entry = Map::new();
            entry.insert(
                clause.field.clone(),
                json!({ "order": clause.direction.as_str() }),
            );
            Value::Object(entry)
        })
        .collect();

    let mut body = json!({
        "_source": query.projection,
        "sort": sort,
        "from": query.from,
        "size": query.size,
    });

    if let Some(clause) = &query.query {
        body["query"] = json!({
            "multi_match": {
                "query": clause.query,
                "fuzziness": clause.fuzziness,
                "fields": clause.fields,
            }
        });
    }

    body
}

fn send_failure(err: reqwest::Error) -> SearchError {
    if err.is_builder() {
        SearchError::malformed(err.to_string())
    } else {
        SearchError::transient(err)
    }
}

fn status_failure(status: StatusCode, body: &[u8]) -> SearchError {
    let detail = format!("status {status} body {}", String::from_utf8_lossy(body));
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        SearchError::transient(detail)
    } else if status.is_client_error() {
        SearchError::malformed(detail)
    } else {
        SearchError::invalid_response(detail)
    }
}

/// A 404 means an absent document only when it carries the document envelope;
/// an `error` envelope (e.g. `index_not_found_exception`) is a bad request.
fn missing_document(body: &[u8]) -> SearchError {
    match serde_json::from_slice::<DocumentResponse>(body) {
        Ok(DocumentResponse { found: false, .. }) => SearchError::NotFound,
        _ => status_failure(StatusCode::NOT_FOUND, body),
    }
}

fn parse_envelope<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SearchError> {
    serde_json::from_slice(bytes)
        .map_err(|err| SearchError::invalid_response(format!("failed to parse body: {err}")))
}

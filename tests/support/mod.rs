//! Shared fixtures for catalog integration tests.

#![allow(dead_code)]

use std::cmp::Ordering as CmpOrdering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use marquee::application::query::{BackendQuery, MatchClause, SortClause};
use marquee::application::repos::{SearchBackend, SearchError};
use marquee::domain::types::SortDirection;
use serde_json::{Map, Value, json};

/// In-process stand-in for the search engine.
///
/// Fields registered as text are tokenized: sorting on them directly is
/// rejected like the real engine does, only their `.raw` sub-field sorts.
#[derive(Default)]
pub struct InMemoryBackend {
    indexes: HashMap<String, Vec<Value>>,
    text_fields: HashSet<String>,
    failures: Mutex<VecDeque<SearchError>>,
    calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(mut self, index: &str, documents: Vec<Value>) -> Self {
        self.indexes
            .entry(index.to_string())
            .or_default()
            .extend(documents);
        self
    }

    pub fn with_text_fields(mut self, fields: &[&str]) -> Self {
        self.text_fields
            .extend(fields.iter().map(|field| field.to_string()));
        self
    }

    /// Queue failures returned, in order, by the next backend calls.
    pub fn fail_next(&self, failures: impl IntoIterator<Item = SearchError>) {
        self.failures
            .lock()
            .expect("failures lock")
            .extend(failures);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<(), SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().expect("failures lock").pop_front() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn documents(&self, index: &str) -> Result<&[Value], SearchError> {
        self.indexes
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| SearchError::malformed(format!("no such index `{index}`")))
    }

    fn check_sort(&self, clause: &SortClause) -> Result<(), SearchError> {
        if self.text_fields.contains(&clause.field) {
            return Err(SearchError::malformed(format!(
                "text field `{}` is not sortable",
                clause.field
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn get(&self, index: &str, id: &str) -> Result<Value, SearchError> {
        self.begin_call()?;
        self.documents(index)?
            .iter()
            .find(|document| document["id"].as_str() == Some(id))
            .cloned()
            .ok_or(SearchError::NotFound)
    }

    async fn search(&self, index: &str, query: &BackendQuery) -> Result<Vec<Value>, SearchError> {
        self.begin_call()?;
        for clause in &query.sort {
            self.check_sort(clause)?;
        }

        let mut hits: Vec<&Value> = self
            .documents(index)?
            .iter()
            .filter(|document| match &query.query {
                Some(clause) => matches_clause(document, clause),
                None => true,
            })
            .collect();

        hits.sort_by(|left, right| {
            query
                .sort
                .iter()
                .map(|clause| compare(left, right, clause))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(CmpOrdering::Equal)
        });

        let from = usize::try_from(query.from).unwrap_or(usize::MAX);
        let size = usize::try_from(query.size).unwrap_or(usize::MAX);
        Ok(hits
            .into_iter()
            .skip(from)
            .take(size)
            .map(|document| project(document, &query.projection))
            .collect())
    }
}

fn compare(left: &Value, right: &Value, clause: &SortClause) -> CmpOrdering {
    let field = clause.field.strip_suffix(".raw").unwrap_or(&clause.field);
    let ordering = match (&left[field], &right[field]) {
        (Value::String(a), Value::String(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(CmpOrdering::Equal),
        _ => CmpOrdering::Equal,
    };
    match clause.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn project(document: &Value, projection: &[&str]) -> Value {
    let mut projected = Map::new();
    for field in projection {
        if let Some(value) = document.get(*field) {
            projected.insert((*field).to_string(), value.clone());
        }
    }
    Value::Object(projected)
}

/// Every query token must be within the clause's edit distance of some token
/// of one searched field.
fn matches_clause(document: &Value, clause: &MatchClause) -> bool {
    let query_tokens = tokens(&clause.query);
    clause.fields.iter().any(|field| {
        let name = field.split('^').next().unwrap_or(field);
        let Some(text) = document.get(name).and_then(Value::as_str) else {
            return false;
        };
        let field_tokens = tokens(text);
        query_tokens.iter().all(|wanted| {
            field_tokens
                .iter()
                .any(|token| edit_distance(wanted, token) <= usize::from(clause.fuzziness))
        })
    })
}

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }
    previous[b.len()]
}

pub fn work(id: &str, title: &str, rating: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("Description of {title}"),
        "creation_date": "2010-02-05T00:00:00Z",
        "rating": rating,
        "type": "movie",
        "uuid": "6ecc7a32-14a1-4022-b4a6-1b4e7d3c9f0a",
        "genres": [],
        "people": [],
        "director": "Pierre Morel",
    })
}

pub fn category(id: &str, genre: &str) -> Value {
    json!({
        "id": id,
        "genre": genre,
        "created": "2021-06-16T20:14:09Z",
        "modified": "2021-06-16T20:14:09Z",
    })
}

pub fn contributor(id: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "id": id,
        "first_name": first_name,
        "last_name": last_name,
        "birth_date": "1960-01-01",
        "created": "2021-06-16T20:14:09Z",
        "modified": "2021-06-16T20:14:09Z",
    })
}

/// Ten works with ids `w01`..`w10` and mixed-case titles.
pub fn seeded_works() -> Vec<Value> {
    let titles = [
        "Zulu",
        "From Paris with Love",
        "2046",
        "alpha",
        "Beta",
        "In the Mood for Love",
        "Chungking Express",
        "amelie",
        "Taken",
        "Fallen Angels",
    ];
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| work(&format!("w{:02}", i + 1), title, 5.0 + i as f64 / 2.0))
        .collect()
}

pub fn catalog_backend() -> InMemoryBackend {
    InMemoryBackend::new()
        .with_documents("movies", seeded_works())
        .with_documents(
            "genres",
            vec![category("g1", "Drama"), category("g2", "Action")],
        )
        .with_documents(
            "people",
            vec![
                contributor("1b6c0b2e-3e0f-4d9a-9f6e-2f1f8f0e6a01", "Luc", "Besson"),
                contributor("1b6c0b2e-3e0f-4d9a-9f6e-2f1f8f0e6a02", "Wong", "Kar-wai"),
            ],
        )
        .with_text_fields(&["title", "genre", "first_name", "last_name"])
}

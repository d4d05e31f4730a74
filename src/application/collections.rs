//! Fixed per-collection configuration: index, cache tag, projection and
//! fuzzy-match fields.

use std::fmt::Display;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::entities::{Category, Contributor, Work};
use crate::domain::types::{CategorySortField, ContributorSortField, SortField, WorkSortField};

/// A field searched by the fuzzy match clause, with its relative boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoostedField {
    pub name: &'static str,
    pub boost: Option<u32>,
}

impl BoostedField {
    pub const fn boosted(name: &'static str, boost: u32) -> Self {
        Self {
            name,
            boost: Some(boost),
        }
    }

    pub const fn plain(name: &'static str) -> Self {
        Self { name, boost: None }
    }

    /// Render in the `field^boost` notation understood by the backend.
    pub fn render(&self) -> String {
        match self.boost {
            Some(boost) => format!("{}^{boost}", self.name),
            None => self.name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    /// Backend index holding the documents.
    pub index: &'static str,
    /// Short tag prefixed to cache keys; distinct per collection.
    pub key_tag: &'static str,
    /// Explicit allow-list of returned fields.
    pub projection: &'static [&'static str],
    pub fuzzy_fields: &'static [BoostedField],
}

/// One entity collection served by the catalog.
pub trait Collection: Send + Sync + 'static {
    type Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Id: Display + Send + Sync + ?Sized;
    type SortField: SortField;

    const SPEC: CollectionSpec;
}

#[derive(Debug, Clone, Copy)]
pub struct Works;

#[derive(Debug, Clone, Copy)]
pub struct Categories;

#[derive(Debug, Clone, Copy)]
pub struct Contributors;

impl Collection for Works {
    type Entity = Work;
    type Id = str;
    type SortField = WorkSortField;

    const SPEC: CollectionSpec = CollectionSpec {
        index: "movies",
        key_tag: "film",
        projection: &[
            "id",
            "title",
            "rating",
            "description",
            "creation_date",
            "type",
            "uuid",
            "genres",
            "people",
            "certificate",
            "file_path",
        ],
        fuzzy_fields: &[
            BoostedField::boosted("title", 5),
            BoostedField::boosted("description", 4),
            BoostedField::boosted("genre", 3),
            BoostedField::boosted("actors_names", 3),
            BoostedField::boosted("writers_names", 2),
            BoostedField::plain("director"),
        ],
    };
}

impl Collection for Categories {
    type Entity = Category;
    type Id = str;
    type SortField = CategorySortField;

    const SPEC: CollectionSpec = CollectionSpec {
        index: "genres",
        key_tag: "genre",
        projection: &["id", "genre", "created", "modified"],
        fuzzy_fields: &[BoostedField::boosted("genre", 3)],
    };
}

impl Collection for Contributors {
    type Entity = Contributor;
    type Id = Uuid;
    type SortField = ContributorSortField;

    const SPEC: CollectionSpec = CollectionSpec {
        index: "people",
        key_tag: "person",
        projection: &[
            "id",
            "first_name",
            "last_name",
            "birth_date",
            "created",
            "modified",
        ],
        fuzzy_fields: &[
            BoostedField::boosted("first_name", 2),
            BoostedField::boosted("last_name", 2),
        ],
    };
}

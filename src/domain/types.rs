//! Shared domain enumerations aligned with indexed document fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Movie,
    TvShow,
}

impl WorkType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Movie => "movie",
            WorkType::TvShow => "tv_show",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A sortable field of one collection.
///
/// Text fields are tokenized by the search engine, so sorting on them must go
/// through their untokenized `.raw` sub-field.
pub trait SortField: Copy + Default + Send + Sync + 'static {
    /// Public name of the field, as accepted at the request boundary.
    fn as_str(self) -> &'static str;

    /// Document field the sort applies to.
    fn document_field(self) -> &'static str {
        self.as_str()
    }

    fn is_text(self) -> bool;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum WorkSortField {
    #[default]
    Id,
    Title,
    #[value(name = "imdb_rating")]
    ImdbRating,
}

impl SortField for WorkSortField {
    fn as_str(self) -> &'static str {
        match self {
            WorkSortField::Id => "id",
            WorkSortField::Title => "title",
            WorkSortField::ImdbRating => "imdb_rating",
        }
    }

    fn document_field(self) -> &'static str {
        match self {
            WorkSortField::ImdbRating => "rating",
            other => other.as_str(),
        }
    }

    fn is_text(self) -> bool {
        matches!(self, WorkSortField::Title)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CategorySortField {
    #[default]
    Id,
    Genre,
}

impl SortField for CategorySortField {
    fn as_str(self) -> &'static str {
        match self {
            CategorySortField::Id => "id",
            CategorySortField::Genre => "genre",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, CategorySortField::Genre)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ContributorSortField {
    #[default]
    Id,
    #[value(name = "first_name")]
    FirstName,
    #[value(name = "last_name")]
    LastName,
}

impl SortField for ContributorSortField {
    fn as_str(self) -> &'static str {
        match self {
            ContributorSortField::Id => "id",
            ContributorSortField::FirstName => "first_name",
            ContributorSortField::LastName => "last_name",
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            ContributorSortField::FirstName | ContributorSortField::LastName
        )
    }
}

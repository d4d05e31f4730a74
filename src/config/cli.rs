use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use uuid::Uuid;

use crate::application::query::{DEFAULT_PAGE_SIZE, ListRequest};
use crate::domain::types::{
    CategorySortField, ContributorSortField, SortDirection, SortField, WorkSortField,
};

/// Command-line arguments for the Marquee binary.
#[derive(Debug, Parser)]
#[command(
    name = "marquee",
    version,
    about = "Cached catalog reads over a search backend"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "MARQUEE_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Read works (movies and TV shows).
    Films {
        #[command(subcommand)]
        action: FilmsAction,
    },
    /// Read categories.
    Genres {
        #[command(subcommand)]
        action: GenresAction,
    },
    /// Read contributors.
    People {
        #[command(subcommand)]
        action: PeopleAction,
    },
}

#[derive(Debug, Subcommand, Clone)]
pub enum FilmsAction {
    /// List works, optionally filtered by a fuzzy text query.
    List(FilmListArgs),
    /// Fetch one work by id.
    Get(TextIdArgs),
}

#[derive(Debug, Subcommand, Clone)]
pub enum GenresAction {
    /// List categories, optionally filtered by a fuzzy text query.
    List(GenreListArgs),
    /// Fetch one category by id.
    Get(TextIdArgs),
}

#[derive(Debug, Subcommand, Clone)]
pub enum PeopleAction {
    /// List contributors, optionally filtered by a fuzzy text query.
    List(PersonListArgs),
    /// Fetch one contributor by id.
    Get(UuidArgs),
}

#[derive(Debug, Args, Clone)]
pub struct FilmListArgs {
    /// Sort field.
    #[arg(long, value_enum, value_name = "FIELD")]
    pub sort: Option<WorkSortField>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args, Clone)]
pub struct GenreListArgs {
    /// Sort field.
    #[arg(long, value_enum, value_name = "FIELD")]
    pub sort: Option<CategorySortField>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args, Clone)]
pub struct PersonListArgs {
    /// Sort field.
    #[arg(long, value_enum, value_name = "FIELD")]
    pub sort: Option<ContributorSortField>,

    #[command(flatten)]
    pub page: PageArgs,
}

/// Query, ordering and paging shared by every `list` subcommand.
#[derive(Debug, Args, Clone)]
pub struct PageArgs {
    /// Free-text query matched fuzzily against the collection's search fields.
    #[arg(long, value_name = "TEXT")]
    pub query: Option<String>,

    /// Sort direction.
    #[arg(long, value_enum, value_name = "DIRECTION")]
    pub order: Option<SortDirection>,

    /// 1-based page number.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page: u32,

    /// Page size.
    #[arg(
        long,
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub limit: u32,
}

impl PageArgs {
    pub fn into_request<S: SortField>(self, sort: Option<S>) -> ListRequest<S> {
        ListRequest {
            query: self.query,
            sort: sort.unwrap_or_default(),
            direction: self.order.unwrap_or_default(),
            page: self.page,
            page_size: self.limit,
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct TextIdArgs {
    /// Document id.
    pub id: String,
}

#[derive(Debug, Args, Clone)]
pub struct UuidArgs {
    /// Contributor UUID.
    pub id: Uuid,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the search backend base URL.
    #[arg(long = "search-url", value_name = "URL", global = true)]
    pub search_url: Option<String>,

    /// Override the search request timeout.
    #[arg(long = "search-timeout-seconds", value_name = "SECONDS", global = true)]
    pub search_timeout_seconds: Option<u64>,

    /// Override the cache backend (memory|redis).
    #[arg(long = "cache-backend", value_name = "BACKEND", global = true)]
    pub cache_backend: Option<String>,

    /// Override the Redis connection URL.
    #[arg(long = "cache-redis-url", value_name = "URL", global = true)]
    pub cache_redis_url: Option<String>,

    /// Override the cache entry time-to-live.
    #[arg(long = "cache-ttl-seconds", value_name = "SECONDS", global = true)]
    pub cache_ttl_seconds: Option<u64>,

    /// Toggle collection-scoped list keys.
    #[arg(
        long = "cache-scope-list-keys",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub cache_scope_list_keys: Option<bool>,

    /// Override the total number of search attempts.
    #[arg(long = "retry-max-attempts", value_name = "COUNT", global = true)]
    pub retry_max_attempts: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

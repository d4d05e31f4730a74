use std::{process, sync::Arc};

use marquee::{
    application::{
        catalog::{CachedEntityService, Catalog},
        collections::Collection,
        error::AppError,
        query::ListRequest,
        repos::SearchBackend,
        retry::RetryPolicy,
    },
    cache::{CacheConfig, CacheStore, MemoryStore, RedisStore},
    config::{self, CacheBackend, Command, FilmsAction, GenresAction, PeopleAction},
    infra::{elastic::ElasticsearchBackend, error::InfraError, telemetry},
};
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let catalog = build_catalog(&settings).await?;

    match cli_args.command {
        Command::Films { action } => match action {
            FilmsAction::List(args) => {
                run_list(catalog.works(), args.page.into_request(args.sort)).await
            }
            FilmsAction::Get(args) => run_get(catalog.works(), args.id.as_str()).await,
        },
        Command::Genres { action } => match action {
            GenresAction::List(args) => {
                run_list(catalog.categories(), args.page.into_request(args.sort)).await
            }
            GenresAction::Get(args) => run_get(catalog.categories(), args.id.as_str()).await,
        },
        Command::People { action } => match action {
            PeopleAction::List(args) => {
                run_list(catalog.contributors(), args.page.into_request(args.sort)).await
            }
            PeopleAction::Get(args) => run_get(catalog.contributors(), &args.id).await,
        },
    }
}

async fn build_catalog(settings: &config::Settings) -> Result<Catalog, AppError> {
    let backend: Arc<dyn SearchBackend> =
        Arc::new(ElasticsearchBackend::from_settings(&settings.search)?);

    let cache_config = CacheConfig::from(&settings.cache);
    let store: Arc<dyn CacheStore> = match &settings.cache.backend {
        CacheBackend::Memory => Arc::new(MemoryStore::new(&cache_config)),
        CacheBackend::Redis { url } => Arc::new(
            RedisStore::connect(url)
                .await
                .map_err(|err| InfraError::cache_store(err.to_string()))?,
        ),
    };

    info!(
        target = "marquee::catalog",
        search_url = %settings.search.url,
        cache_backend = ?settings.cache.backend,
        ttl_secs = cache_config.ttl.as_secs(),
        scoped_list_keys = cache_config.scope_list_keys,
        "Catalog ready"
    );

    Ok(Catalog::new(
        backend,
        store,
        RetryPolicy::from(&settings.retry),
        &cache_config,
    ))
}

async fn run_list<C: Collection>(
    service: &CachedEntityService<C>,
    request: ListRequest<C::SortField>,
) -> Result<(), AppError> {
    let entities = service.list(Some(&request)).await?;
    print_json(&entities)
}

async fn run_get<C: Collection>(
    service: &CachedEntityService<C>,
    id: &C::Id,
) -> Result<(), AppError> {
    match service.get_by_id(id).await? {
        Some(entity) => print_json(&entity),
        None => Err(AppError::not_found(C::SPEC.key_tag, id.to_string())),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to render output: {err}")))?;
    println!("{rendered}");
    Ok(())
}

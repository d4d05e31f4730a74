use clap::Parser;
use uuid::Uuid;

use super::*;
use crate::domain::types::{ContributorSortField, SortDirection, WorkSortField};

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.search.url.as_str(), "http://127.0.0.1:9200/");
    assert_eq!(settings.search.timeout, Duration::from_secs(10));
    assert_eq!(settings.cache.backend, CacheBackend::Memory);
    assert_eq!(settings.cache.ttl, Duration::from_secs(300));
    assert_eq!(settings.cache.capacity.get(), 10_000);
    assert!(settings.cache.scope_list_keys);
    assert_eq!(settings.retry.max_attempts.get(), 3);
    assert_eq!(settings.retry.base_delay, Duration::from_millis(100));
    assert_eq!(settings.retry.jitter, Duration::from_millis(100));
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.cache.ttl_seconds = Some(60);
    raw.logging.level = Some("info".to_string());

    let overrides = Overrides {
        cache_ttl_seconds: Some(5),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.cache.ttl, Duration::from_secs(5));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = Overrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn redis_backend_requires_url() {
    let mut raw = RawSettings::default();
    raw.cache.backend = Some("redis".to_string());

    let err = Settings::from_raw(raw.clone()).expect_err("missing redis url");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.redis_url",
            ..
        }
    ));

    raw.cache.redis_url = Some("redis://127.0.0.1:6379".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(
        settings.cache.backend,
        CacheBackend::Redis {
            url: "redis://127.0.0.1:6379".to_string()
        }
    );
}

#[test]
fn unknown_cache_backend_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.backend = Some("memcached".to_string());

    let err = Settings::from_raw(raw).expect_err("unknown backend");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.backend",
            ..
        }
    ));
}

#[test]
fn zero_values_are_rejected() {
    let cases: [(fn(&mut RawSettings), &str); 4] = [
        (|raw| raw.cache.ttl_seconds = Some(0), "cache.ttl_seconds"),
        (|raw| raw.cache.capacity = Some(0), "cache.capacity"),
        (|raw| raw.retry.max_attempts = Some(0), "retry.max_attempts"),
        (
            |raw| raw.search.timeout_seconds = Some(0),
            "search.timeout_seconds",
        ),
    ];

    for (mutate, expected) in cases {
        let mut raw = RawSettings::default();
        mutate(&mut raw);
        match Settings::from_raw(raw) {
            Err(LoadError::Invalid { key, .. }) => assert_eq!(key, expected),
            other => panic!("expected invalid `{expected}`, got {other:?}"),
        }
    }
}

#[test]
fn cache_ttl_is_bounded() {
    let mut raw = RawSettings::default();
    raw.cache.ttl_seconds = Some(u64::MAX);
    match Settings::from_raw(raw) {
        Err(LoadError::Invalid { key, .. }) => assert_eq!(key, "cache.ttl_seconds"),
        other => panic!("expected invalid ttl, got {other:?}"),
    }

    let mut raw = RawSettings::default();
    raw.cache.ttl_seconds = Some(365 * 24 * 60 * 60);
    let settings = Settings::from_raw(raw).expect("one year is accepted");
    assert_eq!(settings.cache.ttl, Duration::from_secs(31_536_000));
}

#[test]
fn search_url_must_be_http() {
    let mut raw = RawSettings::default();
    raw.search.url = Some("ftp://search.local".to_string());
    assert!(Settings::from_raw(raw).is_err());

    let mut raw = RawSettings::default();
    raw.search.url = Some("not a url".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("bad level");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "logging.level",
            ..
        }
    ));
}

#[test]
fn parse_films_list_arguments() {
    let args = CliArgs::parse_from([
        "marquee",
        "films",
        "list",
        "--query",
        "paris",
        "--sort",
        "imdb_rating",
        "--order",
        "desc",
        "--page",
        "2",
        "--limit",
        "10",
    ]);

    let Command::Films {
        action: FilmsAction::List(list),
    } = args.command
    else {
        panic!("expected films list");
    };

    let request = list.page.into_request(list.sort);
    assert_eq!(request.query.as_deref(), Some("paris"));
    assert_eq!(request.sort, WorkSortField::ImdbRating);
    assert_eq!(request.direction, SortDirection::Desc);
    assert_eq!((request.page, request.page_size), (2, 10));
}

#[test]
fn list_arguments_default_to_first_page_by_id() {
    let args = CliArgs::parse_from(["marquee", "people", "list"]);

    let Command::People {
        action: PeopleAction::List(list),
    } = args.command
    else {
        panic!("expected people list");
    };

    let request = list.page.into_request(list.sort);
    assert_eq!(request.sort, ContributorSortField::Id);
    assert_eq!(request.direction, SortDirection::Asc);
    assert_eq!((request.page, request.page_size), (1, 50));
    assert!(request.query.is_none());
}

#[test]
fn page_zero_is_rejected_at_parse_time() {
    let result = CliArgs::try_parse_from(["marquee", "genres", "list", "--page", "0"]);
    assert!(result.is_err());

    let result = CliArgs::try_parse_from(["marquee", "genres", "list", "--limit", "0"]);
    assert!(result.is_err());
}

#[test]
fn people_get_requires_uuid() {
    let id = Uuid::nil().to_string();
    let args = CliArgs::parse_from(["marquee", "people", "get", id.as_str()]);
    assert!(matches!(
        args.command,
        Command::People {
            action: PeopleAction::Get(UuidArgs { id }),
        } if id.is_nil()
    ));

    assert!(CliArgs::try_parse_from(["marquee", "people", "get", "not-a-uuid"]).is_err());
}

#[test]
fn global_overrides_follow_subcommands() {
    let args = CliArgs::parse_from([
        "marquee",
        "films",
        "get",
        "tt0111161",
        "--search-url",
        "http://search:9200",
        "--cache-scope-list-keys",
        "false",
    ]);

    let mut raw = RawSettings::default();
    raw.apply_overrides(&args.overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.search.url.host_str(), Some("search"));
    assert!(!settings.cache.scope_list_keys);
}

use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "marquee_cache_hit_total",
            Unit::Count,
            "Total number of read-through cache hits."
        );
        describe_counter!(
            "marquee_cache_miss_total",
            Unit::Count,
            "Total number of read-through cache misses."
        );
        describe_counter!(
            "marquee_cache_store_total",
            Unit::Count,
            "Total number of values written to the cache store after a miss."
        );
        describe_counter!(
            "marquee_search_retry_total",
            Unit::Count,
            "Total number of search backend calls retried after a transient failure."
        );
        describe_histogram!(
            "marquee_search_ms",
            Unit::Milliseconds,
            "Search backend call latency in milliseconds, retries included."
        );
    });
}

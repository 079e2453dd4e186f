//! Logging setup.
//!
//! Development builds log pretty, multi-line events with source locations.
//! Production logs one flattened JSON object per event, including the request
//! span fields, for the log collector.
//!
//! `RUST_LOG` replaces the default filter, e.g. `RUST_LOG=kqa_api=trace,reqwest=debug`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEVELOPMENT_FILTER: &str = "debug,tower_http=debug,hyper=info,reqwest=info";
const PRODUCTION_FILTER: &str = "info,tower_http=info,hyper=warn,reqwest=warn";

/// Install the global subscriber for `env`.
pub fn init_tracing(env: &Environment) {
    let default_filter = if env.is_development() {
        DEVELOPMENT_FILTER
    } else {
        PRODUCTION_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = if env.is_development() {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .pretty()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .flatten_event(true)
            .with_target(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!(environment = ?env, "Tracing initialized");
}

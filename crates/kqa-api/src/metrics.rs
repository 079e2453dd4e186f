//! Prometheus metrics for request traffic, provider calls and quiz lifecycle.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use kqa_quiz::Category;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("valid uuid pattern")
});
static NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+(/|$)").expect("valid number pattern"));

/// Install the Prometheus recorder.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )?
        // Generation calls take seconds, not milliseconds
        .set_buckets_for_metric(
            Matcher::Full("provider_call_duration_seconds".to_string()),
            &[0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request counts, latency and in-flight requests.
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let in_flight = gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone());
    in_flight.increment(1.0);

    let response = next.run(req).await;

    in_flight.decrement(1.0);

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Replace session ids and numeric segments with `:id`.
fn normalize_path(path: &str) -> String {
    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    NUMBER_SEGMENT
        .replace_all(&normalized, "/:id$1")
        .into_owned()
}

pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record one call to a generation provider.
///
/// `kind` is `questions` or `image`.
pub fn record_provider_call(kind: &'static str, success: bool, duration_secs: f64) {
    let outcome = if success { "success" } else { "failure" };

    counter!("provider_calls_total", "kind" => kind, "outcome" => outcome).increment(1);
    histogram!("provider_call_duration_seconds", "kind" => kind).record(duration_secs);
}

/// Record a quiz lifecycle event: `started`, `completed` or `unavailable`.
pub fn record_quiz_event(event: &'static str, category: Category) {
    counter!(
        "quiz_events_total",
        "event" => event,
        "category" => category.slug()
    )
    .increment(1);
}

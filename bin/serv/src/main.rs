use std::net::SocketAddr;

use axum::{Router, middleware, routing::get};
use kqa_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    kqa_api::tracing::init_tracing(&config.env);
    tracing::debug!(?config, "Configuration loaded");

    let metrics_handle = kqa_api::metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    let state = ApiState::new(&config)?;

    let _job_handles =
        kqa_api::jobs::start_background_jobs(state.sessions.clone(), config.session_idle());
    tracing::info!(
        idle_minutes = config.session_idle_minutes,
        "Background jobs started (idle session sweep)"
    );

    let cors = kqa_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(kqa_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = kqa_api::router::router()
        .merge(metrics_app)
        .with_state(state)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(kqa_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            kqa_api::middleware::request_id::request_id_middleware,
        ));

    let app = kqa_api::middleware::security_headers::apply_security_headers(app, config.env);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        environment = ?config.env,
        "KidQuiz Adventure server listening"
    );

    // Peer addresses feed the per-client rate limits
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

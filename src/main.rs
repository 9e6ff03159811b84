// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::clock::SystemClock;
use crate::application::realtime_scheduler::spawn_scheduler;
use crate::application::session::SessionRegistry;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_backend::HttpBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers;

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/personas", get(handlers::list_personas))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/:id", delete(handlers::close_session))
        .route("/sessions/:id/scene", get(handlers::get_scene))
        .route("/sessions/:id/updates", get(handlers::stream_updates))
        .route("/sessions/:id/dashboard", post(handlers::load_dashboard))
        .route("/sessions/:id/preload", get(handlers::preload))
        .route("/sessions/:id/metrics", get(handlers::metrics))
        .route(
            "/sessions/:id/containers/:container",
            put(handlers::mount_container).delete(handlers::unmount_container),
        )
        .route("/sessions/:id/charts", delete(handlers::destroy_all_charts))
        .route(
            "/sessions/:id/charts/:container",
            get(handlers::chart_status)
                .post(handlers::render_chart)
                .delete(handlers::destroy_chart),
        )
        .route("/sessions/:id/charts/:container/realtime", post(handlers::set_realtime))
        .route("/sessions/:id/charts/:container/refresh", post(handlers::refresh_chart))
        .route("/sessions/:id/charts/:container/events", post(handlers::chart_event))
        .route(
            "/sessions/:id/charts/:container/cross-domain",
            post(handlers::cross_domain).delete(handlers::dismiss_overlay),
        )
        .route("/sessions/:id/persona", post(handlers::generate_persona))
        .route("/sessions/:id/persona/export", get(handlers::export_persona))
        .route("/sessions/:id/persona/analyses", get(handlers::persona_analyses))
        .route("/sessions/:id/personas/:persona_id", put(handlers::select_persona))
        .route("/sessions/:id/campaign", post(handlers::analyze_campaign))
        .route("/sessions/:id/analysis/:endpoint", post(handlers::run_analysis))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_app_config()?;

    // Infrastructure
    let backend = Arc::new(HttpBackend::new(&config.backend));
    let sessions = SessionRegistry::new(Arc::new(SystemClock), config.realtime.default_interval())
        .with_idle_ttl(config.realtime.session_ttl());

    // One timer for every session's real-time charts
    let shutdown = CancellationToken::new();
    let scheduler = spawn_scheduler(
        sessions.clone(),
        config.realtime.tick_interval(),
        shutdown.clone(),
    );

    let state = Arc::new(AppState { sessions, backend });

    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting tasteshift-charts service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    shutdown.cancel();
    scheduler.await?;
    Ok(())
}

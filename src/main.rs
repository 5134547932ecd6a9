// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::session_service::SessionService;
use crate::infrastructure::config::{load_app_config, load_widgets_config};
use crate::infrastructure::static_store::StaticRecordStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    create_session, end_session, focus, get_session, health_check, list_months, month_charts,
    month_dashboard, month_summary, month_table, record_detail, select_month, session_events,
    set_query, sort_by, unfocus,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let widgets_config = load_widgets_config()?;

    // Load the month datasets once (infrastructure layer)
    let store = Arc::new(StaticRecordStore::load_dir(&app_config.data.dir)?);

    // Create services (application layer)
    let dashboard_service =
        DashboardService::new(store, widgets_config, app_config.dashboard.title.clone());
    tracing::info!("Dataset months: {:?}", dashboard_service.months());
    let session_service = SessionService::new(dashboard_service.clone());

    // Drop abandoned sessions in the background
    let sweeper = session_service.clone();
    let idle_timeout = app_config.sessions.idle_timeout();
    let mut sweep = tokio::time::interval(app_config.sessions.sweep_interval());
    tokio::spawn(async move {
        loop {
            sweep.tick().await;
            let evicted = sweeper.evict_idle(idle_timeout);
            if evicted > 0 {
                tracing::info!("Evicted {} idle sessions, {} open", evicted, sweeper.len());
            }
        }
    });

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        session_service,
    });

    // Build router (presentation layer)
    // Note: the event stream is merged after CompressionLayer so snapshot
    // lines reach observers unbuffered
    let streaming = Router::new().route("/sessions/:id/events", get(session_events));

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/months", get(list_months))
        .route("/months/:month/summary", get(month_summary))
        .route("/months/:month/charts", get(month_charts))
        .route("/months/:month/table", get(month_table))
        .route("/months/:month/dashboard", get(month_dashboard))
        .route("/months/:month/records/:handle", get(record_detail))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(end_session))
        .route("/sessions/:id/month", post(select_month))
        .route("/sessions/:id/query", post(set_query))
        .route("/sessions/:id/sort", post(sort_by))
        .route("/sessions/:id/focus", post(focus))
        .route("/sessions/:id/unfocus", post(unfocus))
        .layer(CompressionLayer::new())
        .merge(streaming)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = app_config.server.socket_addr()?;
    tracing::info!("Starting channel-metrics service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

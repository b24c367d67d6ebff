// Main entry point - Wiring for the acquisition node and the monitor
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::monitor_service::MonitorService;
use crate::application::node_service::NodeService;
use crate::infrastructure::config::{load_config, MonitorConfig, NodeConfig, Role};
use crate::infrastructure::http_snapshot_source::HttpSnapshotSource;
use crate::infrastructure::indicator_output::LogIndicator;
use crate::infrastructure::simulated_bus::simulated_sensors;
use crate::presentation::app_state::{MonitorState, NodeState};
use crate::presentation::display::LogDisplay;
use crate::presentation::{monitor_handlers, node_handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG wins over the default directive
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;
    match config.role {
        Role::Node => run_node(config.node).await,
        Role::Monitor => run_monitor(config.monitor).await,
    }
}

async fn run_node(config: NodeConfig) -> anyhow::Result<()> {
    // Create node service (application layer)
    let (service, handle) = NodeService::new(config.settings());

    // Wire simulated sensors and outputs (infrastructure layer)
    let sensors = simulated_sensors(&config.simulation);
    let node_task = tokio::spawn(service.run(
        sensors,
        Box::new(LogIndicator::new()),
        Box::new(LogDisplay),
        shutdown_signal(),
    ));

    // Create application state
    let state = Arc::new(NodeState { node: handle });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(node_handlers::health_check))
        .route("/telemetry", get(node_handlers::get_telemetry))
        .route("/status", get(node_handlers::get_status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    serve(&config.bind_addr, router, "node").await?;
    // Let the node switch the indicator off before the runtime goes away
    node_task.await.context("node task failed")?;
    Ok(())
}

async fn run_monitor(config: MonitorConfig) -> anyhow::Result<()> {
    let settings = config.settings()?;

    // Create HTTP snapshot source (infrastructure layer)
    let source = Arc::new(HttpSnapshotSource::new(
        config.node_url.clone(),
        Duration::from_millis(config.request_timeout_ms),
    )?);
    // Create monitor service (application layer)
    let (service, handle) = MonitorService::new(source, settings);
    tokio::spawn(service.run());
    tracing::info!("Polling node at {}", config.node_url);

    // Create application state
    let state = Arc::new(MonitorState { monitor: handle });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(monitor_handlers::health_check))
        .route("/metrics", get(monitor_handlers::get_metrics))
        .route("/history", get(monitor_handlers::get_history))
        .route("/baseline/reset", post(monitor_handlers::reset_baseline))
        .route("/diameter", put(monitor_handlers::set_diameter))
        .route("/window", put(monitor_handlers::set_window))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    serve(&config.bind_addr, router, "monitor").await
}

async fn serve(bind_addr: &str, router: Router, role: &str) -> anyhow::Result<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", bind_addr))?;
    tracing::info!("Starting balloon-telemetry {} on {}", role, addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

//! HTTP server implementation for the fleet service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, put};
use tokio::signal;

use super::broadcast::ReportBroadcaster;
use super::config::FleetServerConfig;
use super::handlers::{
    AppState, handle_delete_all, handle_delete_unit, handle_get_recent, handle_get_today,
    handle_healthy, handle_metrics, handle_ready, handle_upsert,
};
use super::metrics::Metrics;
use super::ws::handle_ws;
use crate::repository::UnitRepository;

/// HTTP/WebSocket server for the fleet service.
pub struct FleetServer {
    repo: Arc<UnitRepository>,
    config: FleetServerConfig,
}

impl FleetServer {
    /// Create a new fleet server.
    pub fn new(repo: Arc<UnitRepository>, config: FleetServerConfig) -> Self {
        Self { repo, config }
    }

    /// Run the HTTP server until SIGINT/SIGTERM.
    pub async fn run(self) {
        let state = AppState {
            repo: self.repo,
            broadcaster: Arc::new(ReportBroadcaster::new()),
            metrics: Arc::new(Metrics::new()),
        };
        let app = router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        tracing::info!("Starting fleet HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind listen address");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .expect("server error");

        tracing::info!("Server shut down gracefully");
    }
}

/// Builds the route table. Shared with the HTTP integration tests.
pub fn router(state: AppState) -> Router {
    // The static /carts/today route takes precedence over the
    // /carts/:unit_id capture.
    Router::new()
        .route("/carts/today", get(handle_get_today))
        .route("/carts/:unit_id", put(handle_upsert))
        .route("/carts/:unit_id", delete(handle_delete_unit))
        .route("/carts", delete(handle_delete_all))
        .route("/cart/:unit_id", get(handle_get_recent))
        .route("/ws", get(handle_ws))
        .route("/metrics", get(handle_metrics))
        .route("/-/healthy", get(handle_healthy))
        .route("/-/ready", get(handle_ready))
        .with_state(state)
}

/// Listen for SIGTERM (pod termination) and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}

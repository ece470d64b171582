//! Mindmap HTTP server
//!
//! Exposes the node and edge stores from `mindmap-core` as a JSON REST API.
//!
//! # Architecture
//!
//! Endpoints are grouped per resource and merged into one router:
//! - `node_endpoints`: health check and node CRUD/listing
//! - `edge_endpoints`: edge CRUD/listing
//!
//! Every handler is a thin wrapper: extract, call the service, map the
//! `ServiceError` through `HttpError`.
//!
//! # Usage
//!
//! ```bash
//! MINDMAP_PORT=4000 RUST_LOG=debug cargo run --bin mindmap-server
//! ```

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mindmap_core::{DatabaseService, EdgeService, NodeService};

pub mod config;
mod edge_endpoints;
mod http_error;
mod node_endpoints;

pub use config::{ConfigError, ServerConfig};
pub use http_error::HttpError;
pub use node_endpoints::HealthStatus;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub node_service: Arc<NodeService>,
    pub edge_service: Arc<EdgeService>,
}

impl AppState {
    /// Build both services over one database
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self {
            node_service: Arc::new(NodeService::new(db.clone())),
            edge_service: Arc::new(EdgeService::new(db)),
        }
    }
}

/// Create the application router with all endpoint modules
///
/// An empty `cors_origins` allows any origin.
pub fn create_router(state: AppState, cors_origins: &[HeaderValue]) -> Router {
    Router::new()
        .merge(node_endpoints::routes(state.clone()))
        .merge(edge_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[HeaderValue]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(false);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins.to_vec())
    }
}

/// Open the database and serve until Ctrl-C
///
/// # Errors
///
/// Returns error if the database cannot be opened or the listener fails to
/// bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Database: {}", config.db_path.display());
    let db = Arc::new(DatabaseService::new(config.db_path.clone()).await?);

    let app = create_router(AppState::new(db.clone()), &config.cors_origins);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);
    if config.cors_origins.is_empty() {
        tracing::info!("CORS: any origin");
    } else {
        tracing::info!("CORS: {:?}", config.cors_origins);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, checkpointing WAL");
    if let Err(e) = db.checkpoint().await {
        tracing::warn!("WAL checkpoint failed: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

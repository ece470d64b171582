//! Mindmap HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Defaults: 127.0.0.1:4000, ./data/mindmap.db
//! cargo run --bin mindmap-server
//!
//! # Custom settings
//! MINDMAP_PORT=8080 MINDMAP_DB_PATH=/tmp/maps.db cargo run --bin mindmap-server
//! ```
//!
//! # Environment Variables
//!
//! - `MINDMAP_DB_PATH`: Database file (default: ./data/mindmap.db)
//! - `MINDMAP_HOST`: Bind address (default: 127.0.0.1)
//! - `MINDMAP_PORT`: Server port (default: 4000)
//! - `CORS_ALLOW_ORIGIN`: Comma-separated allowed origins (default: any)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use mindmap_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Mindmap HTTP Server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env()?;

    mindmap_server::start_server(config).await
}

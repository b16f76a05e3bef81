//! lexbridge server library.
//!
//! Serves the MCP handler either for the binary or for the integration tests.

#![deny(missing_docs)]

mod health;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{Router, routing::get};
use config::Config;
use mcp::McpServer;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Configuration for serving lexbridge over HTTP.
pub struct ServeConfig {
    /// The socket address (IP and port) the server will bind to.
    pub listen_address: SocketAddr,
    /// The deserialized lexbridge TOML configuration.
    pub config: Config,
    /// Stops the server gracefully once cancelled.
    pub shutdown: CancellationToken,
}

/// Builds the HTTP application: the MCP endpoint and, when enabled, the
/// health endpoint.
pub fn app(config: &Config) -> anyhow::Result<Router> {
    let mcp_server = McpServer::new(config)?;
    let mut app = mcp::router_for(mcp_server, &config.server.path);

    if config.server.health.enabled {
        app = app.route(&config.server.health.path, get(health::health));
    }

    Ok(app)
}

/// Starts and runs the streamable HTTP server until `shutdown` is cancelled.
pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        shutdown,
    }: ServeConfig,
) -> anyhow::Result<()> {
    let app = app(&config)?;

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {listen_address}: {e}"))?;

    log::info!("MCP endpoint available at: http://{listen_address}{}", config.server.path);

    if config.server.health.enabled {
        log::info!("Health check endpoint exposed at http://{listen_address}{}", config.server.health.path);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| anyhow!("Failed to start HTTP server: {e}"))?;

    log::info!("Server stopped");

    Ok(())
}

/// Runs the MCP handler over stdin/stdout until the client disconnects.
pub async fn serve_stdio(config: Config) -> anyhow::Result<()> {
    mcp::serve_stdio(&config).await
}

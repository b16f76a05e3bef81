//! MCP surface of lexbridge: CourtListener endpoints exposed as tools.

#![deny(missing_docs)]

mod credentials;
mod format;
mod server;
mod tool;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing};
use config::Config;
use rmcp::{
    ServiceExt,
    transport::{
        StreamableHttpServerConfig, StreamableHttpService, streamable_http_server::session::never::NeverSessionManager,
    },
};

pub use server::McpServer;

/// Creates an axum router serving the MCP handler at `server.path`.
pub fn router(config: &Config) -> anyhow::Result<Router> {
    let mcp_server = McpServer::new(config)?;
    Ok(router_for(mcp_server, &config.server.path))
}

/// Mounts an already built handler at `path`.
pub fn router_for(mcp_server: McpServer, path: &str) -> Router {
    log::info!("Creating MCP router for path: {path}");

    let service = StreamableHttpService::new(
        move || Ok(mcp_server.clone()),
        Arc::new(NeverSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: Some(Duration::from_secs(5)),
            stateful_mode: false,
        },
    );

    Router::new().route(
        path,
        routing::get_service(service.clone())
            .post_service(service.clone())
            .delete_service(service),
    )
}

/// Serves the MCP handler over stdin/stdout until the client disconnects.
pub async fn serve_stdio(config: &Config) -> anyhow::Result<()> {
    let mcp_server = McpServer::new(config)?;

    log::info!("Serving MCP over stdio");

    let reason = mcp_server.serve(rmcp::transport::stdio()).await?.waiting().await?;
    log::debug!("stdio session ended: {reason:?}");

    Ok(())
}

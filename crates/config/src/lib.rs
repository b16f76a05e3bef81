//! Lexbridge configuration structures to map the lexbridge.toml configuration.

#![deny(missing_docs)]

mod loader;
mod rate_limit;
mod sanitization;
mod upstream;

use std::{borrow::Cow, net::SocketAddr, path::Path};

pub use rate_limit::RateLimitConfig;
pub use sanitization::SanitizationConfig;
use serde::Deserialize;
pub use upstream::{DEFAULT_BASE_URL, UpstreamConfig};

/// Main configuration structure for the Lexbridge application.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server and transport settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Settings for the CourtListener REST API.
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Per-client rate limiting applied before every upstream call.
    #[serde(default)]
    pub rate_limits: RateLimitConfig,
    /// Input sanitization settings.
    #[serde(default)]
    pub sanitization: SanitizationConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Validates value ranges that serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        loader::validate(self)
    }
}

/// How the MCP protocol is exposed to clients.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Transport {
    /// JSON-RPC over the process standard input and output.
    #[serde(rename = "stdio")]
    Stdio,
    /// MCP streamable HTTP, served with axum.
    #[serde(rename = "streamable-http")]
    #[default]
    StreamableHttp,
}

/// Server configuration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// The transport used to talk to MCP clients.
    pub transport: Transport,
    /// The socket address the HTTP server should listen on.
    pub listen_address: Option<SocketAddr>,
    /// The path of the MCP endpoint when served over HTTP.
    pub path: String,
    /// Health endpoint configuration.
    pub health: HealthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            listen_address: None,
            path: "/mcp".to_string(),
            health: HealthConfig::default(),
        }
    }
}

/// Health endpoint configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the health endpoint is enabled.
    pub enabled: bool,
    /// The path for the health endpoint.
    pub path: Cow<'static, str>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        HealthConfig {
            enabled: true,
            path: Cow::Borrowed("/health"),
        }
    }
}

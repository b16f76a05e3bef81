//! Test support: a mock CourtListener API, a running lexbridge server and an MCP client.

mod courtlistener;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use config::{Config, RateLimitConfig, SanitizationConfig, UpstreamConfig};
use guard::RequestGuard;
use http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use rate_limit::RateLimitManager;
use rmcp::{
    model::CallToolRequestParam,
    service::{RunningService, ServiceExt},
    transport::{StreamableHttpClientTransport, streamable_http_client::StreamableHttpClientTransportConfig},
};
use server::ServeConfig;
use tokio::{net::TcpListener, time::timeout};
use tokio_util::sync::CancellationToken;
use upstream::UpstreamClient;

pub use courtlistener::{MockCourtListener, RecordedRequest, scotus};

/// A well-formed CourtListener API key.
pub const API_KEY: &str = "0123456789abcdef0123456789abcdef01234567";

/// Builds an upstream client against `base_url` with its own guard and limiter.
pub fn upstream_client(base_url: &str, limit: u32, timeout: Duration) -> UpstreamClient {
    let rate_limits = RateLimitConfig {
        limit,
        ..Default::default()
    };

    let upstream = UpstreamConfig {
        base_url: base_url.parse().unwrap(),
        timeout,
        ..Default::default()
    };

    let rate_limits = Arc::new(RateLimitManager::new(rate_limits));
    let guard = Arc::new(RequestGuard::new(rate_limits, &SanitizationConfig::default()));

    UpstreamClient::new(&upstream, guard).unwrap()
}

/// Test client for plain HTTP requests to the test server
pub struct TestClient {
    base_url: String,
    client: reqwest::Client,
}

impl TestClient {
    /// Create a new test client for the given base URL
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Send a GET request to the given path
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap()
    }
}

/// MCP client for testing MCP protocol functionality
pub struct McpTestClient {
    service: RunningService<rmcp::RoleClient, ()>,
}

impl McpTestClient {
    /// Connects to the given MCP endpoint URL, optionally sending a bearer token.
    pub async fn new(mcp_url: String, bearer: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();

        if let Some(token) = bearer {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}")).unwrap());
        }

        let client = reqwest::Client::builder().default_headers(headers).build().unwrap();
        let config = StreamableHttpClientTransportConfig::with_uri(mcp_url);
        let transport = StreamableHttpClientTransport::with_client(client, config);

        let service = ().serve(transport).await.unwrap();

        Self { service }
    }

    /// Get server information
    pub fn get_server_info(&self) -> &rmcp::model::InitializeResult {
        self.service.peer_info().unwrap()
    }

    /// List available tools
    pub async fn list_tools(&self) -> rmcp::model::ListToolsResult {
        self.service.list_tools(Default::default()).await.unwrap()
    }

    /// Call a tool with the given name and arguments
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> rmcp::model::CallToolResult {
        self.service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: arguments.as_object().cloned(),
            })
            .await
            .unwrap()
    }

    /// Call a tool and expect the protocol call itself to fail
    pub async fn call_tool_expect_error(&self, name: &str, arguments: serde_json::Value) -> rmcp::ServiceError {
        self.service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: arguments.as_object().cloned(),
            })
            .await
            .unwrap_err()
    }

    /// Disconnect the client
    pub async fn disconnect(self) {
        self.service.cancel().await.unwrap();
    }
}

/// The text of the first content item of a tool result.
pub fn result_text(result: &rmcp::model::CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.clone())
        .unwrap_or_default()
}

/// A lexbridge server running on an ephemeral port, stopped on drop.
pub struct TestServer {
    /// Plain HTTP client bound to the server address.
    pub client: TestClient,
    /// Address the server listens on.
    pub address: SocketAddr,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Start a new test server with the given TOML configuration
    pub async fn start(config_toml: &str) -> Self {
        let config: Config = toml::from_str(config_toml).unwrap();
        config.validate().unwrap();

        let health_path = config.server.health.path.to_string();

        // Find an available port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let shutdown = CancellationToken::new();

        let serve_config = ServeConfig {
            listen_address: address,
            config,
            shutdown: shutdown.clone(),
        };

        tokio::spawn(async move {
            if let Err(e) = server::serve(serve_config).await {
                eprintln!("Server failed: {e}");
            }
        });

        let client = TestClient::new(format!("http://{address}"));

        // Wait until the health endpoint answers
        for _ in 0..20 {
            if let Ok(Ok(_)) = timeout(Duration::from_millis(100), reqwest::get(format!("http://{address}{health_path}"))).await {
                break;
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestServer {
            client,
            address,
            shutdown,
        }
    }

    /// Create an MCP client that connects to this server's MCP endpoint
    pub async fn mcp_client(&self, path: &str) -> McpTestClient {
        McpTestClient::new(format!("http://{}{path}", self.address), None).await
    }

    /// Like [`mcp_client`](Self::mcp_client), sending `Authorization: Bearer <token>`
    pub async fn mcp_client_with_bearer(&self, path: &str, token: &str) -> McpTestClient {
        McpTestClient::new(format!("http://{}{path}", self.address), Some(token)).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

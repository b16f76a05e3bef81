use std::sync::Arc;

use config::Config;
use guard::RequestGuard;
use indoc::indoc;
use itertools::Itertools;
use rate_limit::RateLimitManager;
use rmcp::{
    RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, ErrorCode, ErrorData, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use upstream::UpstreamClient;

use crate::{
    credentials::CredentialSource,
    tool::{self, RmcpTool},
};

/// The lexbridge MCP handler. Cheap to clone, all state is shared.
#[derive(Clone)]
pub struct McpServer(Arc<Inner>);

struct Inner {
    info: ServerInfo,
    tools: Vec<Box<dyn RmcpTool>>,
}

impl McpServer {
    /// Builds the rate limiter, request guard and upstream client once and
    /// shares them between all tools.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        if !config.rate_limits.enabled {
            log::warn!("Rate limiting is disabled");
        }

        let rate_limits = Arc::new(RateLimitManager::new(config.rate_limits.clone()));
        let guard = Arc::new(RequestGuard::new(rate_limits, &config.sanitization));
        let upstream = Arc::new(UpstreamClient::new(&config.upstream, guard)?);

        if config.upstream.api_key.is_none() {
            log::info!("No CourtListener API key configured, anonymous calls unless clients send their own");
        }

        let credentials = Arc::new(CredentialSource::new(config.upstream.api_key.clone()));

        Ok(Self::with_tools(tool::all(upstream, credentials)))
    }

    fn with_tools(tools: Vec<Box<dyn RmcpTool>>) -> Self {
        let mut server_info = Implementation::from_build_env();
        server_info.name = "lexbridge".to_string();
        server_info.version = env!("CARGO_PKG_VERSION").to_string();

        log::debug!("Registered tools: {}", tools.iter().map(|tool| tool.name()).join(", "));

        let inner = Inner {
            info: ServerInfo {
                protocol_version: ProtocolVersion::V_2025_03_26,
                capabilities: ServerCapabilities::builder().enable_tools().build(),
                server_info,
                instructions: Some(INSTRUCTIONS.to_string()),
            },
            tools,
        };

        Self(Arc::new(inner))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        self.0.info.clone()
    }

    async fn list_tools(
        &self,
        _: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.0.tools.iter().map(|tool| tool.to_tool()).collect(),
        })
    }

    async fn call_tool(
        &self,
        CallToolRequestParam { name, arguments }: CallToolRequestParam,
        ctx: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        if let Some(tool) = self.0.tools.iter().find(|tool| tool.name() == name) {
            log::debug!("Calling tool '{name}'");
            return tool.call(ctx, arguments).await;
        }

        Err(ErrorData::new(
            ErrorCode::INVALID_PARAMS,
            format!("Unknown tool '{}'", guard::sanitize(&name)),
            None,
        ))
    }
}

const INSTRUCTIONS: &str = indoc! {r#"
    This server gives read-only access to the CourtListener case-law database.

    **Tools:**
    - `search_opinions`, `search_oral_arguments` and `search_dockets` run full-text searches.
    - `get_opinion`, `get_cluster`, `get_docket`, `get_court` and `get_judge` fetch one record by ID.
    - `list_courts` lists courts; its IDs can be used as the `court` filter of the search tools.
    - `search_judges` finds judges by name.

    Start with a search, then fetch the records you need by ID. When a tool reports that data
    could not be retrieved, wait a moment before trying again.
"#};

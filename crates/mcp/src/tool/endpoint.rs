use std::{borrow::Cow, marker::PhantomData, sync::Arc};

use http::request::Parts;
use rmcp::{
    ErrorData,
    model::{CallToolResult, Content, ErrorCode, ToolAnnotations},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use upstream::UpstreamClient;

use super::Tool;
use crate::{credentials::CredentialSource, format};

/// A read-only CourtListener REST endpoint exposed as a tool.
pub(crate) trait Endpoint: Send + Sync + 'static {
    type Parameters: DeserializeOwned + JsonSchema + Send;
    type Response: DeserializeOwned + Send;

    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn request(parameters: Self::Parameters) -> Result<UpstreamRequest, ErrorData>;
    fn format(response: &Self::Response) -> String;
}

/// Path and raw query arguments of one upstream call.
#[derive(Debug, PartialEq)]
pub(crate) struct UpstreamRequest {
    pub path: String,
    pub query: Map<String, Value>,
}

impl UpstreamRequest {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Map::new(),
        }
    }

    /// Uses the serialized parameters as the query arguments.
    pub(crate) fn with_query(mut self, parameters: &impl Serialize) -> Result<Self, ErrorData> {
        match serde_json::to_value(parameters) {
            Ok(Value::Object(query)) => {
                self.query = query;
                Ok(self)
            }
            _ => Err(ErrorData::new(
                ErrorCode::INVALID_PARAMS,
                "parameters must be an object",
                None,
            )),
        }
    }

    pub(crate) fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.query.insert(key.to_string(), value.into());
        self
    }
}

/// Parameters of the detail endpoints keyed by a numeric ID.
#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct RecordId {
    /// CourtListener ID of the record.
    pub id: u64,
}

/// Turns a caller supplied identifier into a single URL path segment.
pub(crate) fn path_segment(raw: &str) -> Result<String, ErrorData> {
    let id = guard::sanitize(raw);
    let id = id.trim();

    if id.is_empty() || id == "." || id == ".." {
        return Err(ErrorData::new(
            ErrorCode::INVALID_PARAMS,
            format!("invalid identifier '{id}'"),
            None,
        ));
    }

    Ok(url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

pub(crate) struct EndpointTool<E> {
    upstream: Arc<UpstreamClient>,
    credentials: Arc<CredentialSource>,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> EndpointTool<E> {
    pub(crate) fn new(upstream: Arc<UpstreamClient>, credentials: Arc<CredentialSource>) -> Self {
        Self {
            upstream,
            credentials,
            _endpoint: PhantomData,
        }
    }
}

impl<E: Endpoint> Tool for EndpointTool<E> {
    type Parameters = E::Parameters;

    fn name() -> &'static str {
        E::NAME
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed(E::DESCRIPTION)
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::new().read_only(true).open_world(true)
    }

    async fn call(&self, parts: Parts, parameters: Self::Parameters) -> anyhow::Result<CallToolResult> {
        let UpstreamRequest { path, query } = E::request(parameters)?;
        let credential = self.credentials.resolve(&parts.headers);

        let result = self
            .upstream
            .fetch_as::<E::Response>(&path, &query, credential.as_deref())
            .await;

        Ok(match result {
            Ok(response) => CallToolResult::success(vec![Content::text(E::format(&response))]),
            Err(_) => CallToolResult::error(vec![Content::text(format::UNAVAILABLE)]),
        })
    }
}

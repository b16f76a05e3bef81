mod courts;
mod dockets;
mod endpoint;
mod judges;
mod opinions;
mod search;

use std::{borrow::Cow, sync::Arc};

use futures_util::future::BoxFuture;
use http::request::Parts;
use rmcp::{
    ErrorData, RoleServer,
    model::{CallToolResult, ErrorCode, JsonObject, ToolAnnotations},
    service::RequestContext,
};
use schemars::schema_for;
use serde::de::DeserializeOwned;
use serde_json::Value;
use upstream::UpstreamClient;

use crate::credentials::CredentialSource;

pub(crate) use endpoint::EndpointTool;

pub(crate) trait Tool: Send + Sync + 'static {
    type Parameters: DeserializeOwned + schemars::JsonSchema;

    fn name() -> &'static str;
    fn description(&self) -> Cow<'_, str>;
    fn annotations(&self) -> ToolAnnotations;

    fn call(
        &self,
        parts: Parts,
        parameters: Self::Parameters,
    ) -> impl Future<Output = anyhow::Result<CallToolResult>> + Send;
}

pub(crate) trait RmcpTool: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn to_tool(&self) -> rmcp::model::Tool;

    fn call(
        &self,
        ctx: RequestContext<RoleServer>,
        parameters: Option<JsonObject>,
    ) -> BoxFuture<'_, Result<CallToolResult, ErrorData>>;
}

impl<T: Tool> RmcpTool for T {
    fn name(&self) -> &str {
        T::name()
    }

    fn to_tool(&self) -> rmcp::model::Tool {
        let schema = match serde_json::to_value(schema_for!(<T as Tool>::Parameters)) {
            Ok(Value::Object(schema)) => schema,
            _ => JsonObject::new(),
        };

        rmcp::model::Tool::new(self.name().to_string(), self.description().into_owned(), schema)
            .annotate(self.annotations())
    }

    fn call(
        &self,
        mut ctx: RequestContext<RoleServer>,
        parameters: Option<JsonObject>,
    ) -> BoxFuture<'_, Result<CallToolResult, ErrorData>> {
        // Only the streamable HTTP transport attaches the inbound request.
        let parts = ctx
            .extensions
            .remove::<Parts>()
            .unwrap_or_else(|| http::Request::new(()).into_parts().0);

        Box::pin(async move {
            let parameters: T::Parameters = serde_json::from_value(Value::Object(parameters.unwrap_or_default()))
                .map_err(|err| ErrorData::new(ErrorCode::INVALID_PARAMS, err.to_string(), None))?;

            match Tool::call(self, parts, parameters).await {
                Ok(data) => Ok(data),
                Err(err) => {
                    if let Some(error_data) = err.downcast_ref::<ErrorData>() {
                        Err(error_data.clone())
                    } else {
                        Err(ErrorData::new(ErrorCode::INTERNAL_ERROR, err.to_string(), None))
                    }
                }
            }
        })
    }
}

/// Every CourtListener tool, in listing order.
pub(crate) fn all(upstream: Arc<UpstreamClient>, credentials: Arc<CredentialSource>) -> Vec<Box<dyn RmcpTool>> {
    vec![
        Box::new(EndpointTool::<search::Opinions>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<search::OralArguments>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<search::Dockets>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<opinions::Opinion>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<opinions::Cluster>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<dockets::Docket>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<courts::ListCourts>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<courts::Court>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<judges::SearchJudges>::new(upstream.clone(), credentials.clone())),
        Box::new(EndpointTool::<judges::Judge>::new(upstream, credentials)),
    ]
}

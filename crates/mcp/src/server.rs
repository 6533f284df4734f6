//! MCP Server Implementation
//!
//! Serves the registry's tools over the Model Context Protocol. Listing and calling
//! both go through the [`ToolRegistry`], so MCP clients see exactly what was installed.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData, ListToolsResult,
        PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
    },
    service::RequestContext,
    RoleServer, ServerHandler, ServiceExt,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::registry::{ToolDefinition, ToolRegistry};

/// MCP front end for the storefront tools.
#[derive(Clone)]
pub struct FornoMcpServer {
    registry: Arc<ToolRegistry>,
}

impl FornoMcpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Run the server with stdio transport until the client disconnects.
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        info!(
            event_name = "forno.mcp.starting",
            tools = self.registry.len(),
            "starting MCP server with stdio transport"
        );

        let service = self.serve(rmcp::transport::stdio()).await?;
        let reason = service.waiting().await?;

        info!(event_name = "forno.mcp.stopped", reason = ?reason, "MCP server shutdown complete");
        Ok(())
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.registry.definitions().into_iter().map(to_mcp_tool).collect()
    }

    /// Forwards a call to the registry; failures stay inside the envelope text.
    pub async fn dispatch(&self, request: CallToolRequestParam) -> CallToolResult {
        debug!(event_name = "forno.mcp.call", tool = %request.name, "tool call received");
        let params = request.arguments.map(Value::Object).unwrap_or(Value::Null);
        let result = self.registry.call(&request.name, params).await;
        CallToolResult::success(vec![Content::text(result.text().to_string())])
    }
}

fn to_mcp_tool(definition: ToolDefinition) -> Tool {
    let read_only = definition.is_read_only();
    let schema = match definition.input_schema {
        Value::Object(schema) => schema,
        _ => serde_json::Map::new(),
    };

    let mut tool = Tool::new(definition.name, definition.description, Arc::new(schema));
    if read_only {
        tool.annotations =
            Some(ToolAnnotations { read_only_hint: Some(true), ..Default::default() });
    }
    tool
}

impl ServerHandler for FornoMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Forno Antico pizza configurator. Call menu.get_catalog first to discover \
                 category and ingredient IDs, build a pizza with configurator.set_selection, \
                 add it with cart.add_current_pizza, then order.place."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(self.dispatch(request).await)
    }
}

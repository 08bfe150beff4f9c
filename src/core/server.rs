//! MCP Server implementation and lifecycle management.
//!
//! The server handler wires the startup-built pieces together: the action
//! registries (via the ToolRouter), the resource catalogue, and the AWS
//! context. Everything is constructed once in `McpServer::new`; request
//! handling only reads.
//!
//! Adding a new action or resource does NOT require modifying this file -
//! the router and the resource registry pick them up from their definition
//! modules.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use tracing::{info, instrument};

use super::aws::AwsContext;
use super::config::Config;
use crate::domains::{resources::ResourceService, tools::build_tool_router};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Service for handling resource-related requests.
    resource_service: Arc<ResourceService>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration and AWS context.
    pub fn new(config: Config, aws: Arc<AwsContext>) -> Self {
        let config = Arc::new(config);
        let resource_service = Arc::new(ResourceService::new());
        let tool_router = build_tool_router::<Self>(aws);

        info!(
            tools = tool_router.list_all().len(),
            "tool router initialized"
        );

        Self {
            config,
            resource_service,
            tool_router,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Number of registered tools (dispatchers plus generated actions).
    pub fn tool_count(&self) -> usize {
        self.tool_router.list_all().len()
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "AWS EC2/EBS/VPC operations as MCP tools. Each service has a generic \
                 dispatcher (aws_ec2, aws_ebs, aws_vpc) taking {\"action\": ..., ...fields}, \
                 plus generated per-action tools (e.g. ec2_start_instance). Read the \
                 resource:// catalogue documents for each service's action reference."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = self.resource_service.list_resources().await;
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: Vec::new(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aws::stub::StubAws;

    fn test_server() -> McpServer {
        let aws = StubAws::new("running").context("us-east-1");
        McpServer::new(Config::default(), aws)
    }

    #[test]
    fn test_server_metadata() {
        let server = test_server();
        assert_eq!(server.name(), "aws-mcp");
        assert!(!server.version().is_empty());
    }

    #[test]
    fn test_server_registers_all_tools() {
        let server = test_server();
        assert_eq!(server.tool_count(), 64);
    }
}

//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the configuration and the [`Dispatcher`]. Both
//! transports go through it: the HTTP transport calls [`McpServer::invoke`],
//! the STDIO transport goes through the rmcp `ServerHandler` whose tool
//! router is generated from the same registry.
//!
//! Tools are defined in `domains/tools/definitions/`, one file per store
//! resource. **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{
    Dispatcher, FunctionCallResult, ToolContext, ToolInvocation, ToolRegistry, build_tool_router,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Runs tool calls against the configured store.
    dispatcher: Arc<Dispatcher>,

    /// Tool router for handling rmcp tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with every built-in tool registered.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, ToolRegistry::with_defaults())
    }

    /// Create a server around a caller-supplied registry.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        let config = Arc::new(config);
        let context = ToolContext::new(config.store.clone());
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), context));

        info!("{} tools registered", dispatcher.registry().len());

        Self {
            tool_router: build_tool_router::<Self>(Arc::clone(&dispatcher)),
            dispatcher,
            config,
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

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Run one tool invocation (HTTP transport).
    ///
    /// Domain failures come back inside the result; only internal errors
    /// and panics surface as `Err`.
    pub async fn invoke(
        &self,
        invocation: ToolInvocation,
    ) -> super::error::Result<FunctionCallResult> {
        Ok(self.dispatcher.invoke(invocation).await?)
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "WooCommerce and WordPress store management. Call `tools_list` for the catalog; \
                 every tool accepts site_url and credential overrides."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::store_for;
    use crate::domains::tools::TOOLS_LIST;
    use serde_json::json;

    fn server_for(url: &str) -> McpServer {
        let mut config = Config::default();
        config.store = store_for(url);
        McpServer::new(config)
    }

    #[test]
    fn test_server_info() {
        let server = server_for("http://127.0.0.1:1");
        assert_eq!(server.name(), "woocommerce-mcp-server");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));

        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "woocommerce-mcp-server");
    }

    #[test]
    fn test_router_exposes_registry() {
        let server = server_for("http://127.0.0.1:1");
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), server.dispatcher().registry().len());
        assert!(tools.iter().any(|t| t.name == TOOLS_LIST));
    }

    #[tokio::test]
    async fn test_invoke_unknown_function() {
        let server = server_for("http://127.0.0.1:1");
        let result = server
            .invoke(ToolInvocation::new("bogus_fn", json!({})))
            .await
            .unwrap();
        assert_eq!(result.function.as_deref(), Some("bogus_fn"));
        assert_eq!(
            result.result,
            json!({"error": "Function bogus_fn not supported"})
        );
    }
}

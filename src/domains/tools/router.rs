//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Each registry entry becomes a dynamic route whose input schema comes
//! from the tool's derived parameter struct. Calls go
//! through the same [`Dispatcher`] as the HTTP transport.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, Tool},
};
use serde_json::Value;

use super::dispatcher::Dispatcher;
use super::handlers::ToolOutcome;
use super::registry::ToolDescriptor;

/// rmcp model of a registered tool.
pub fn to_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool {
        name: descriptor.name().to_string().into(),
        description: Some(descriptor.description().to_string().into()),
        input_schema: Arc::new(descriptor.input_schema()),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Build the tool router with every tool the dispatcher knows.
pub fn build_tool_router<S>(dispatcher: Arc<Dispatcher>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .registry()
        .descriptors()
        .fold(ToolRouter::new(), |router, descriptor| {
            router.with_route(create_route(descriptor, Arc::clone(&dispatcher)))
        })
}

fn create_route<S>(descriptor: &ToolDescriptor, dispatcher: Arc<Dispatcher>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name().to_string();

    ToolRoute::new_dyn(to_tool(descriptor), move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let dispatcher = Arc::clone(&dispatcher);
        let name = name.clone();
        async move {
            let outcome = dispatcher
                .dispatch(&name, Value::Object(args))
                .await
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(to_call_result(outcome))
        }
        .boxed()
    })
}

fn to_call_result(outcome: ToolOutcome) -> CallToolResult {
    match outcome {
        ToolOutcome::Completed(value) => {
            CallToolResult::success(vec![Content::text(value.to_string())])
        }
        ToolOutcome::Rejected(message) => {
            CallToolResult::error(vec![Content::text(message)])
        }
    }
}

//! Dispatcher - runs a named tool call and isolates callers from handler
//! failures.
//!
//! Unsupported names, bad parameters and remote API errors come back as a
//! [`ToolOutcome::Rejected`]; only internal errors and panics escape as
//! [`DispatchError`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::error::{DispatchError, ToolError};
use super::handlers::{FunctionCallResult, ToolContext, ToolInvocation, ToolOutcome};
use super::params::ToolParams;
use super::registry::ToolRegistry;

/// Executes tool invocations against a registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Run `function` with `params`.
    #[instrument(skip(self, params))]
    pub async fn dispatch(&self, function: &str, params: Value) -> Result<ToolOutcome, DispatchError> {
        let Some(tool) = self.registry.resolve(function) else {
            warn!("Unknown tool requested: {}", function);
            return Ok(ToolOutcome::Rejected(format!(
                "Function {} not supported",
                function
            )));
        };

        let params = match ToolParams::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                warn!("Rejected parameters for {}: {}", function, e);
                return Ok(ToolOutcome::Rejected(e.to_string()));
            }
        };

        let handler = tool.handler();
        let call = handler.call(self.context.clone(), params);

        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(Ok(value)) => {
                info!("Tool {} completed", function);
                Ok(ToolOutcome::Completed(value))
            }
            Ok(Err(ToolError::Internal(message))) => {
                error!("Tool {} failed internally: {}", function, message);
                Err(DispatchError::Internal {
                    function: function.to_string(),
                    message,
                })
            }
            Ok(Err(e)) => {
                warn!("Tool {} returned an error: {}", function, e);
                Ok(ToolOutcome::Rejected(e.to_string()))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Tool {} panicked: {}", function, message);
                Err(DispatchError::Panicked {
                    function: function.to_string(),
                    message,
                })
            }
        }
    }

    /// Run an invocation and wrap the outcome as `{function, result}`.
    #[instrument(skip_all, fields(client_id = ?invocation.client_id))]
    pub async fn invoke(&self, invocation: ToolInvocation) -> Result<FunctionCallResult, DispatchError> {
        let outcome = self
            .dispatch(&invocation.function, invocation.params)
            .await?;
        Ok(FunctionCallResult::new(invocation.function, outcome))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    use crate::core::config::StoreConfig;
    use crate::domains::tools::handlers::ToolResult;
    use crate::domains::tools::registry::ToolDescriptor;
    use crate::store::ApiError;

    async fn echo(_ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
        Ok(params.into_value())
    }

    async fn remote_failure(_ctx: ToolContext, _params: ToolParams) -> ToolResult<Value> {
        Err(ApiError::new("Invalid ID.")
            .with_code("woocommerce_rest_product_invalid_id")
            .with_status(404)
            .into())
    }

    async fn needs_id(_ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
        let id = params.id("product_id")?;
        Ok(json!({ "id": id }))
    }

    async fn broken(_ctx: ToolContext, _params: ToolParams) -> ToolResult<Value> {
        Err(ToolError::internal("state corrupted"))
    }

    async fn panicking(_ctx: ToolContext, _params: ToolParams) -> ToolResult<Value> {
        panic!("handler bug");
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDescriptor::new("echo", "Echo params", echo));
        registry.register(ToolDescriptor::new("remote_failure", "Always 404", remote_failure));
        registry.register(ToolDescriptor::new("needs_id", "Needs an id", needs_id));
        registry.register(ToolDescriptor::new("broken", "Internal error", broken));
        registry.register(ToolDescriptor::new("panicking", "Panics", panicking));

        let context = ToolContext::new(StoreConfig {
            request_timeout: Duration::from_secs(1),
            ..StoreConfig::default()
        });
        Dispatcher::new(Arc::new(registry), context)
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let outcome = dispatcher().dispatch("echo", json!({"a": 1})).await.unwrap();
        assert_eq!(outcome, ToolOutcome::Completed(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_function() {
        let outcome = dispatcher().dispatch("bogus_fn", json!({})).await.unwrap();
        assert_eq!(
            outcome.into_value(),
            json!({"error": "Function bogus_fn not supported"})
        );
    }

    #[tokio::test]
    async fn test_domain_error_becomes_result() {
        let outcome = dispatcher().dispatch("remote_failure", json!({})).await.unwrap();
        assert_eq!(outcome, ToolOutcome::Rejected("Invalid ID.".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_arguments_become_result() {
        let outcome = dispatcher().dispatch("needs_id", json!({})).await.unwrap();
        assert!(outcome.is_error());
        assert_eq!(
            outcome.into_value()["error"],
            "Invalid arguments: Missing or invalid 'product_id' parameter"
        );

        let outcome = dispatcher().dispatch("echo", json!("nope")).await.unwrap();
        assert!(outcome.is_error());
    }

    #[tokio::test]
    async fn test_internal_error_escapes() {
        let err = dispatcher().dispatch("broken", json!({})).await.unwrap_err();
        assert!(matches!(err, DispatchError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let err = dispatcher().dispatch("panicking", json!({})).await.unwrap_err();
        match err {
            DispatchError::Panicked { function, message } => {
                assert_eq!(function, "panicking");
                assert_eq!(message, "handler bug");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invoke_echoes_function_name() {
        let dispatcher = dispatcher();
        for name in ["echo", "remote_failure", "bogus_fn"] {
            let result = dispatcher
                .invoke(ToolInvocation::new(name, json!({})))
                .await
                .unwrap();
            assert_eq!(result.function.as_deref(), Some(name));
        }
    }

    #[tokio::test]
    async fn test_invoke_for_client_returns_same_payload() {
        let dispatcher = dispatcher();
        let plain = dispatcher
            .invoke(ToolInvocation::new("echo", json!({"a": 1})))
            .await
            .unwrap();
        let targeted = dispatcher
            .invoke(ToolInvocation::new("echo", json!({"a": 1})).for_client("abc"))
            .await
            .unwrap();
        assert_eq!(plain, targeted);
    }
}

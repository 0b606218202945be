//! Tool handler contract and the values that flow through it.
//!
//! Every tool, whatever resource it wraps, implements [`ToolHandler`]: it
//! receives the shared [`ToolContext`] and the call's [`ToolParams`] and
//! resolves to JSON or a [`ToolError`]. Plain `async fn(ToolContext,
//! ToolParams) -> ToolResult<Value>` items implement the trait directly.

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::error::ToolError;
use super::params::ToolParams;
use crate::core::config::StoreConfig;
use crate::store::StoreClient;

/// Result type for tool handlers.
pub type ToolResult<T> = Result<T, ToolError>;

// ============================================================================
// Handler trait
// ============================================================================

/// An invocable tool body.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given parameters.
    async fn call(&self, context: ToolContext, params: ToolParams) -> ToolResult<Value>;
}

#[async_trait::async_trait]
impl<F, Fut> ToolHandler for F
where
    F: Fn(ToolContext, ToolParams) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult<Value>> + Send + 'static,
{
    async fn call(&self, context: ToolContext, params: ToolParams) -> ToolResult<Value> {
        (self)(context, params).await
    }
}

// ============================================================================
// Context
// ============================================================================

/// Explicit configuration handed to every handler call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    store: Arc<StoreConfig>,
}

impl ToolContext {
    /// Create a context around the store configuration.
    pub fn new(store: StoreConfig) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The configured store defaults.
    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    /// Build a WooCommerce client, letting `site_url`, `consumer_key` and
    /// `consumer_secret` in `params` override the configured values.
    pub fn woocommerce(&self, params: &ToolParams) -> ToolResult<StoreClient> {
        let site_url = self.pick(params, "site_url", &self.store.site_url);
        let consumer_key = self.pick(params, "consumer_key", &self.store.consumer_key);
        let consumer_secret = self.pick(params, "consumer_secret", &self.store.consumer_secret);

        Ok(StoreClient::woocommerce(
            site_url,
            consumer_key,
            consumer_secret,
            self.store.request_timeout,
        )?)
    }

    /// Build a WordPress client, letting `site_url`, `username` and
    /// `password` in `params` override the configured values.
    pub fn wordpress(&self, params: &ToolParams) -> ToolResult<StoreClient> {
        let site_url = self.pick(params, "site_url", &self.store.site_url);
        let username = self.pick(params, "username", &self.store.username);
        let password = self.pick(params, "password", &self.store.password);

        Ok(StoreClient::wordpress(
            site_url,
            username,
            password,
            self.store.request_timeout,
        )?)
    }

    fn pick<'a>(
        &'a self,
        params: &'a ToolParams,
        key: &str,
        default: &'a Option<String>,
    ) -> &'a str {
        params
            .raw(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or(default.as_deref())
            .unwrap_or("")
    }
}

// ============================================================================
// Invocation and result
// ============================================================================

/// A tool call as received from a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to run.
    pub function: String,

    /// Parameters, expected to be a JSON object (`null` means none).
    #[serde(default)]
    pub params: Value,

    /// Stream that should also receive the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl ToolInvocation {
    pub fn new(function: impl Into<String>, params: Value) -> Self {
        Self {
            function: function.into(),
            params,
            client_id: None,
        }
    }

    /// Target a client stream for asynchronous delivery.
    pub fn for_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// What a dispatched tool produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// The tool ran and returned a value.
    Completed(Value),

    /// The call was rejected: unsupported tool, bad parameters or a remote
    /// API error. Carries the user-facing message.
    Rejected(String),
}

impl ToolOutcome {
    /// Whether the call was rejected.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Wire form: the value itself, or `{"error": message}`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Completed(value) => value,
            Self::Rejected(message) => json!({ "error": message }),
        }
    }
}

/// The `{"function": ..., "result": ...}` payload returned to callers and
/// pushed onto client streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallResult {
    /// Echo of the requested function name.
    pub function: Option<String>,

    /// Tool output, or `{"error": message}`.
    pub result: Value,
}

impl FunctionCallResult {
    pub fn new(function: impl Into<String>, outcome: ToolOutcome) -> Self {
        Self {
            function: Some(function.into()),
            result: outcome.into_value(),
        }
    }

    /// Result for a request that named no function at all.
    pub fn missing_function() -> Self {
        Self {
            function: None,
            result: json!({ "error": "Function name is required" }),
        }
    }

    /// Whether the result carries an error.
    pub fn is_error(&self) -> bool {
        self.result
            .as_object()
            .is_some_and(|obj| obj.len() == 1 && obj.contains_key("error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store() -> StoreConfig {
        StoreConfig {
            site_url: Some("https://shop.example".to_string()),
            username: Some("admin".to_string()),
            password: Some("pw".to_string()),
            consumer_key: Some("ck".to_string()),
            consumer_secret: Some("cs".to_string()),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_outcome_wire_form() {
        assert_eq!(
            ToolOutcome::Completed(json!({"id": 1})).into_value(),
            json!({"id": 1})
        );
        assert_eq!(
            ToolOutcome::Rejected("Function bogus_fn not supported".into()).into_value(),
            json!({"error": "Function bogus_fn not supported"})
        );
    }

    #[test]
    fn test_function_call_result_serialization() {
        let result = FunctionCallResult::new("get_product", ToolOutcome::Completed(json!({"id": 1})));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"function": "get_product", "result": {"id": 1}})
        );
        assert!(!result.is_error());

        let missing = FunctionCallResult::missing_function();
        assert_eq!(
            serde_json::to_value(&missing).unwrap(),
            json!({"function": null, "result": {"error": "Function name is required"}})
        );
        assert!(missing.is_error());
    }

    #[test]
    fn test_invocation_targets_client() {
        let invocation = ToolInvocation::new("get_product", json!({"id": 1}));
        assert_eq!(invocation.client_id, None);

        let invocation = invocation.for_client("abc");
        assert_eq!(invocation.client_id.as_deref(), Some("abc"));
        assert_eq!(
            serde_json::to_value(&invocation).unwrap(),
            json!({"function": "get_product", "params": {"id": 1}, "client_id": "abc"})
        );
    }

    #[test]
    fn test_context_uses_configured_store() {
        let ctx = ToolContext::new(store());
        let client = ctx.woocommerce(&ToolParams::default()).unwrap();
        assert_eq!(client.base_url(), "https://shop.example/wp-json/wc/v3");
    }

    #[test]
    fn test_context_params_override_site() {
        let ctx = ToolContext::new(store());
        let params = ToolParams::from_value(json!({"site_url": "https://other.example"})).unwrap();
        let client = ctx.wordpress(&params).unwrap();
        assert_eq!(client.base_url(), "https://other.example/wp-json/wp/v2");
    }

    #[test]
    fn test_context_without_credentials_fails_fast() {
        let ctx = ToolContext::new(StoreConfig {
            site_url: Some("https://shop.example".to_string()),
            ..StoreConfig::default()
        });
        let err = ctx.woocommerce(&ToolParams::default()).unwrap_err();
        assert_eq!(err.to_string(), "WooCommerce API credentials not provided");
    }

    #[tokio::test]
    async fn test_async_fn_is_a_handler() {
        async fn echo(_ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
            Ok(params.into_value())
        }

        let handler: Arc<dyn ToolHandler> = Arc::new(echo);
        let params = ToolParams::from_value(json!({"a": 1})).unwrap();
        let value = handler.call(ToolContext::new(store()), params).await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }
}

//! Validated access to tool call parameters, and the parameter shapes
//! shared across resources.
//!
//! The `...Params` structs describe a tool's arguments for its input schema
//! and the `tools_list` catalog. Handlers read through [`ToolParams`], which
//! also accepts numeric strings for ids.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::ToolError;
use super::handlers::ToolResult;
use crate::store::Query;

/// Parameters of a single tool call: a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolParams(Map<String, Value>);

impl ToolParams {
    /// Wrap a JSON value. `null` means "no parameters"; anything other than
    /// an object is rejected.
    pub fn from_value(value: Value) -> ToolResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ToolError::invalid_arguments(
                "Parameters must be a JSON object",
            )),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Raw access, `null` treated as absent.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// A positive resource id: an integer, or a string holding one.
    pub fn id(&self, key: &str) -> ToolResult<u64> {
        self.raw(key)
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .ok_or_else(|| missing(key))
    }

    /// Like [`id`](Self::id), falling back to `alias` when `key` is absent.
    pub fn id_or_alias(&self, key: &str, alias: &str) -> ToolResult<u64> {
        if !self.contains(key) && self.contains(alias) {
            return self.id(alias).map_err(|_| missing(key));
        }
        self.id(key)
    }

    /// A required non-empty string.
    pub fn str(&self, key: &str) -> ToolResult<&str> {
        self.opt_str(key).ok_or_else(|| missing(key))
    }

    /// An optional non-empty string.
    pub fn opt_str(&self, key: &str) -> Option<&str> {
        self.raw(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// A required JSON object.
    pub fn object(&self, key: &str) -> ToolResult<&Map<String, Value>> {
        self.raw(key)
            .and_then(Value::as_object)
            .ok_or_else(|| missing(key))
    }

    /// A required JSON array.
    pub fn array(&self, key: &str) -> ToolResult<&Vec<Value>> {
        self.raw(key)
            .and_then(Value::as_array)
            .ok_or_else(|| missing(key))
    }

    /// A required value of any JSON type (except `null`).
    pub fn value(&self, key: &str) -> ToolResult<&Value> {
        self.raw(key).ok_or_else(|| missing(key))
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.raw(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => matches!(s.as_str(), "true" | "1"),
            Some(Value::Number(n)) => n.as_u64().is_some_and(|n| n != 0),
            _ => default,
        }
    }

    pub fn u64_or(&self, key: &str, default: u64) -> u64 {
        self.id(key).unwrap_or(default)
    }

    /// The optional `filters` object.
    pub fn filters(&self) -> Option<&Map<String, Value>> {
        self.raw("filters").and_then(Value::as_object)
    }

    /// `per_page`/`page` (defaults 10 and 1) followed by any `filters`.
    pub fn paging(&self) -> Query {
        let mut query = Query::new();
        query
            .set("per_page", self.u64_or("per_page", 10))
            .set("page", self.u64_or("page", 1));
        if let Some(filters) = self.filters() {
            query.merge_object(filters);
        }
        query
    }
}

// ============================================================================
// Shared parameter shapes
// ============================================================================

/// Tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Paging arguments of every list tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PagingParams {
    /// Results per page (default: 10).
    pub per_page: Option<u64>,

    /// Page number (default: 1).
    pub page: Option<u64>,

    /// Extra query arguments; these override `per_page` and `page`.
    pub filters: Option<Map<String, Value>>,
}

/// Per-call overrides of the configured WooCommerce credentials.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WooCommerceCredentials {
    pub site_url: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
}

/// Per-call overrides of the configured WordPress credentials.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct WordPressCredentials {
    pub site_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn missing(key: &str) -> ToolError {
    ToolError::invalid_arguments(format!("Missing or invalid '{}' parameter", key))
}

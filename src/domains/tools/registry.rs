//! Tool Registry - the name-to-handler table every transport dispatches
//! through.
//!
//! This module provides:
//! - [`ToolDescriptor`]: a tool's name, description, parameter schema and
//!   handler
//! - [`ToolRegistry`]: registration (last wins) and lookup by name
//! - the built-in `tools_list` catalog tool

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::definitions;
use super::handlers::{ToolContext, ToolHandler, ToolResult};
use super::params::{NoParams, ToolParams, WooCommerceCredentials, WordPressCredentials};

/// Name of the built-in catalog tool.
pub const TOOLS_LIST: &str = "tools_list";

const TOOLS_LIST_DESCRIPTION: &str = "List every available tool with its parameters";

// ============================================================================
// Parameters
// ============================================================================

/// Which credentials a tool's client is built from; decides which override
/// properties appear in its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialScope {
    WooCommerce,
    WordPress,
    None,
}

impl CredentialScope {
    /// Schema of the override arguments for this scope.
    fn overrides(self) -> Option<Arc<JsonObject>> {
        match self {
            Self::WooCommerce => Some(cached_schema_for_type::<WooCommerceCredentials>()),
            Self::WordPress => Some(cached_schema_for_type::<WordPressCredentials>()),
            Self::None => None,
        }
    }
}

/// One parameter as listed by `tools_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
}

fn properties(schema: &JsonObject) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

fn required(schema: &JsonObject) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

// ============================================================================
// Descriptor
// ============================================================================

/// A registered tool.
pub struct ToolDescriptor {
    name: String,
    description: String,
    schema: Arc<JsonObject>,
    scope: CredentialScope,
    handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    /// A WooCommerce-scoped tool with no declared parameters.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: cached_schema_for_type::<NoParams>(),
            scope: CredentialScope::WooCommerce,
            handler: Arc::new(handler),
        }
    }

    /// Describe the tool's arguments with the schema derived for `P`.
    pub fn with_params<P: JsonSchema + 'static>(mut self) -> Self {
        self.schema = cached_schema_for_type::<P>();
        self
    }

    pub fn with_scope(mut self, scope: CredentialScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared parameters: required ones first, in declaration order.
    pub fn params(&self) -> Vec<ParamSummary> {
        let Some(properties) = properties(&self.schema) else {
            return Vec::new();
        };
        let required = required(&self.schema);
        let summary = |name: &str, schema: &Value| ParamSummary {
            name: name.to_string(),
            kind: schema
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("any")
                .to_string(),
            required: required.contains(&name),
        };

        let mut params: Vec<ParamSummary> = required
            .iter()
            .filter_map(|&name| properties.get(name).map(|schema| summary(name, schema)))
            .collect();
        params.extend(
            properties
                .iter()
                .filter(|(name, _)| !required.contains(&name.as_str()))
                .map(|(name, schema)| summary(name.as_str(), schema)),
        );
        params
    }

    pub fn handler(&self) -> Arc<dyn ToolHandler> {
        Arc::clone(&self.handler)
    }

    /// JSON Schema for the tool's input, credential overrides included.
    pub fn input_schema(&self) -> JsonObject {
        let mut schema = (*self.schema).clone();
        let Some(overrides) = self.scope.overrides() else {
            return schema;
        };
        let Some(extra) = properties(&overrides) else {
            return schema;
        };

        if let Value::Object(properties) = schema
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()))
        {
            for (name, property) in extra {
                properties
                    .entry(name.clone())
                    .or_insert_with(|| property.clone());
            }
        }
        schema
    }

    /// Catalog entry: `{name, description, parameters}`.
    pub fn summary(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.params(),
        })
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Mapping from tool name to descriptor. Immutable once built.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<ToolDescriptor>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every resource tool plus `tools_list`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        definitions::register_all(&mut registry);
        registry.register_catalog();
        registry
    }

    /// Store a tool under its name. A duplicate name replaces the earlier
    /// entry.
    pub fn register(&mut self, descriptor: ToolDescriptor) {
        let name = descriptor.name.clone();
        if self.tools.insert(name.clone(), Arc::new(descriptor)).is_some() {
            debug!("Tool '{}' re-registered, replacing earlier entry", name);
        }
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Option<Arc<ToolDescriptor>> {
        self.tools.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<ToolDescriptor>> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Register `tools_list` with a snapshot of the current catalog.
    fn register_catalog(&mut self) {
        let mut entries: Vec<Value> = self.descriptors().map(|d| d.summary()).collect();
        entries.push(json!({
            "name": TOOLS_LIST,
            "description": TOOLS_LIST_DESCRIPTION,
            "parameters": [],
        }));
        entries.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

        let catalog = Arc::new(json!({ "tools": entries }));
        self.register(
            ToolDescriptor::new(
                TOOLS_LIST,
                TOOLS_LIST_DESCRIPTION,
                move |_ctx: ToolContext, _params: ToolParams| {
                    let catalog = Arc::clone(&catalog);
                    async move { ToolResult::Ok((*catalog).clone()) }
                },
            )
            .with_scope(CredentialScope::None),
        );
    }
}

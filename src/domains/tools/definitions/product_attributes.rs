//! Global product attributes and their terms.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AttributeIdParams {
    pub attribute_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAttributeParams {
    /// Attribute fields, e.g. `name`, `slug` and `type`.
    pub attribute_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateAttributeParams {
    pub attribute_id: u64,
    pub attribute_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAttributeParams {
    pub attribute_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AttributeTermsParams {
    pub attribute_id: u64,
    #[serde(flatten)]
    pub paging: PagingParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AttributeTermIdParams {
    pub attribute_id: u64,
    pub term_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateAttributeTermParams {
    pub attribute_id: u64,
    pub term_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateAttributeTermParams {
    pub attribute_id: u64,
    pub term_id: u64,
    pub term_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteAttributeTermParams {
    pub attribute_id: u64,
    pub term_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDescriptor::new(
        "get_product_attributes",
        "List product attributes",
        get_product_attributes,
    ));
    registry.register(
        ToolDescriptor::new(
            "get_product_attribute",
            "Get a product attribute",
            get_product_attribute,
        )
        .with_params::<AttributeIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_product_attribute",
            "Create a product attribute",
            create_product_attribute,
        )
        .with_params::<CreateAttributeParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_product_attribute",
            "Update a product attribute",
            update_product_attribute,
        )
        .with_params::<UpdateAttributeParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_product_attribute",
            "Delete a product attribute",
            delete_product_attribute,
        )
        .with_params::<DeleteAttributeParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_attribute_terms",
            "List the terms of a product attribute",
            get_attribute_terms,
        )
        .with_params::<AttributeTermsParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_attribute_term",
            "Get a term of a product attribute",
            get_attribute_term,
        )
        .with_params::<AttributeTermIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_attribute_term",
            "Create a term for a product attribute",
            create_attribute_term,
        )
        .with_params::<CreateAttributeTermParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_attribute_term",
            "Update a term of a product attribute",
            update_attribute_term,
        )
        .with_params::<UpdateAttributeTermParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_attribute_term",
            "Delete a term of a product attribute",
            delete_attribute_term,
        )
        .with_params::<DeleteAttributeTermParams>(),
    );
}

async fn get_product_attributes(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "products/attributes",
            &Query::new(),
            "Failed to get product attributes",
        )
        .await?)
}

async fn get_product_attribute(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/attributes/{}", attribute_id),
            &Query::new(),
            &format!("Failed to get product attribute {}", attribute_id),
        )
        .await?)
}

async fn create_product_attribute(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("attribute_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            "products/attributes",
            &data,
            "Failed to create product attribute",
        )
        .await?)
}

async fn update_product_attribute(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let data = Value::Object(params.object("attribute_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/attributes/{}", attribute_id),
            Some(&data),
            &format!("Failed to update product attribute {}", attribute_id),
        )
        .await?)
}

async fn delete_product_attribute(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/attributes/{}", attribute_id),
            &force(&params, false),
            &format!("Failed to delete product attribute {}", attribute_id),
        )
        .await?)
}

async fn get_attribute_terms(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/attributes/{}/terms", attribute_id),
            &params.paging(),
            &format!("Failed to get terms for attribute {}", attribute_id),
        )
        .await?)
}

async fn get_attribute_term(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let term_id = params.id("term_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/attributes/{}/terms/{}", attribute_id, term_id),
            &Query::new(),
            &format!("Failed to get term {} for attribute {}", term_id, attribute_id),
        )
        .await?)
}

async fn create_attribute_term(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let data = Value::Object(params.object("term_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            &format!("products/attributes/{}/terms", attribute_id),
            &data,
            &format!("Failed to create term for attribute {}", attribute_id),
        )
        .await?)
}

async fn update_attribute_term(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let term_id = params.id("term_id")?;
    let data = Value::Object(params.object("term_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/attributes/{}/terms/{}", attribute_id, term_id),
            Some(&data),
            &format!(
                "Failed to update term {} for attribute {}",
                term_id, attribute_id
            ),
        )
        .await?)
}

async fn delete_attribute_term(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let attribute_id = params.id("attribute_id")?;
    let term_id = params.id("term_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/attributes/{}/terms/{}", attribute_id, term_id),
            &force(&params, false),
            &format!(
                "Failed to delete term {} for attribute {}",
                term_id, attribute_id
            ),
        )
        .await?)
}

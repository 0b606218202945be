//! Product categories.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolError, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

/// Optional category fields shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CategoryFields {
    pub description: Option<String>,
    /// Parent category id.
    pub parent: Option<u64>,
    /// Image object, e.g. `{"src": "..."}`.
    pub image: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CategoryIdParams {
    pub category_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCategoryParams {
    pub name: String,
    #[serde(flatten)]
    pub fields: CategoryFields,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateCategoryParams {
    pub category_id: u64,
    pub name: Option<String>,
    #[serde(flatten)]
    pub fields: CategoryFields,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCategoryParams {
    pub category_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new(
            "get_product_categories",
            "List product categories",
            get_product_categories,
        )
        .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_product_category",
            "Get a product category",
            get_product_category,
        )
        .with_params::<CategoryIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_product_category",
            "Create a product category",
            create_product_category,
        )
        .with_params::<CreateCategoryParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_product_category",
            "Update a product category",
            update_product_category,
        )
        .with_params::<UpdateCategoryParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_product_category",
            "Delete a product category",
            delete_product_category,
        )
        .with_params::<DeleteCategoryParams>(),
    );
}

/// Copy the category fields present in `params`.
fn category_fields(params: &ToolParams) -> Map<String, Value> {
    ["name", "description", "parent", "image"]
        .into_iter()
        .filter_map(|key| params.raw(key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

async fn get_product_categories(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "products/categories",
            &params.paging(),
            "Failed to get product categories",
        )
        .await?)
}

async fn get_product_category(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let category_id = params.id("category_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/categories/{}", category_id),
            &Query::new(),
            &format!("Failed to get product category {}", category_id),
        )
        .await?)
}

async fn create_product_category(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    params.str("name")?;
    let data = Value::Object(category_fields(&params));
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            "products/categories",
            &data,
            "Failed to create product category",
        )
        .await?)
}

async fn update_product_category(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let category_id = params.id("category_id")?;
    let data = category_fields(&params);
    if data.is_empty() {
        return Err(ToolError::invalid_arguments(
            "At least one of 'name', 'description', 'parent' or 'image' is required",
        ));
    }

    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/categories/{}", category_id),
            Some(&Value::Object(data)),
            &format!("Failed to update product category {}", category_id),
        )
        .await?)
}

async fn delete_product_category(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let category_id = params.id("category_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/categories/{}", category_id),
            &force(&params, false),
            &format!("Failed to delete product category {}", category_id),
        )
        .await?)
}

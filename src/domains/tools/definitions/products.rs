//! Products and product metadata.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use super::meta;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

/// Parameters naming one product. `id` is accepted as an alias.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProductIdParams {
    pub product_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateProductParams {
    /// Product fields as accepted by the products endpoint.
    pub product_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateProductParams {
    pub product_id: u64,
    /// Fields to change.
    pub product_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteProductParams {
    pub product_id: u64,
    /// Delete permanently instead of trashing (default: false).
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProductMetaParams {
    pub product_id: u64,
    /// Only return entries with this key.
    pub meta_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetProductMetaParams {
    pub product_id: u64,
    pub meta_key: String,
    pub meta_value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteProductMetaParams {
    pub product_id: u64,
    pub meta_key: String,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("get_products", "List products", get_products)
            .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_product", "Get a product by id", get_product)
            .with_params::<ProductIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_product", "Create a product", create_product)
            .with_params::<CreateProductParams>(),
    );
    registry.register(
        ToolDescriptor::new("update_product", "Update a product", update_product)
            .with_params::<UpdateProductParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_product",
            "Delete a product (to the trash unless force is set)",
            delete_product,
        )
        .with_params::<DeleteProductParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_product_meta", "Get product metadata", get_product_meta)
            .with_params::<ProductMetaParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_product_meta",
            "Create or update a product metadata entry",
            create_product_meta,
        )
        .with_params::<SetProductMetaParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_product_meta",
            "Remove a product metadata entry",
            delete_product_meta,
        )
        .with_params::<DeleteProductMetaParams>(),
    );
}

pub(super) async fn get_products(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("products", &params.paging(), "Failed to get products")
        .await?)
}

async fn get_product(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id_or_alias("product_id", "id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/{}", product_id),
            &Query::new(),
            &format!("Failed to get product {}", product_id),
        )
        .await?)
}

async fn create_product(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("product_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post("products", &data, "Failed to create product")
        .await?)
}

async fn update_product(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let data = Value::Object(params.object("product_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/{}", product_id),
            Some(&data),
            &format!("Failed to update product {}", product_id),
        )
        .await?)
}

async fn delete_product(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/{}", product_id),
            &force(&params, false),
            &format!("Failed to delete product {}", product_id),
        )
        .await?)
}

async fn get_product_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(meta::read_meta(
        &client,
        &format!("products/{}", product_id),
        params.opt_str("meta_key"),
        &format!("Failed to get product {}", product_id),
    )
    .await?)
}

async fn create_product_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let key = params.str("meta_key")?.to_string();
    let value = params.value("meta_value")?.clone();
    let client = ctx.woocommerce(&params)?;
    Ok(meta::edit_meta(
        &client,
        &format!("products/{}", product_id),
        &format!("Failed to get product {}", product_id),
        &format!(
            "Failed to update product meta data for product {}",
            product_id
        ),
        |entries| meta::upsert_meta(entries, &key, value),
    )
    .await?)
}

async fn delete_product_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let key = params.str("meta_key")?.to_string();
    let client = ctx.woocommerce(&params)?;
    Ok(meta::edit_meta(
        &client,
        &format!("products/{}", product_id),
        &format!("Failed to get product {}", product_id),
        &format!(
            "Failed to delete product meta data for product {}",
            product_id
        ),
        |entries| meta::remove_meta(entries, &key),
    )
    .await?)
}

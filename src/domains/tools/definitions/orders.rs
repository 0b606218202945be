//! Orders, order notes and order metadata.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::common::force;
use super::meta;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

/// Parameters naming one order. `id` is accepted as an alias.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderIdParams {
    pub order_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateOrderParams {
    /// Order fields as accepted by the orders endpoint.
    pub order_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateOrderParams {
    pub order_id: u64,
    /// Fields to change.
    pub order_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteOrderParams {
    pub order_id: u64,
    /// Delete permanently instead of trashing (default: false).
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateOrderNoteParams {
    pub order_id: u64,
    pub note: String,
    /// Show the note to the customer (default: false).
    pub customer_note: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OrderMetaParams {
    pub order_id: u64,
    /// Only return entries with this key.
    pub meta_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetOrderMetaParams {
    pub order_id: u64,
    pub meta_key: String,
    pub meta_value: Value,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("get_orders", "List orders", get_orders)
            .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_order", "Get an order by id", get_order)
            .with_params::<OrderIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_order", "Create an order", create_order)
            .with_params::<CreateOrderParams>(),
    );
    registry.register(
        ToolDescriptor::new("update_order", "Update an order", update_order)
            .with_params::<UpdateOrderParams>(),
    );
    registry.register(
        ToolDescriptor::new("delete_order", "Delete an order", delete_order)
            .with_params::<DeleteOrderParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_order_notes", "List the notes of an order", get_order_notes)
            .with_params::<OrderIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_order_note", "Add a note to an order", create_order_note)
            .with_params::<CreateOrderNoteParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_order_meta", "Get order metadata", get_order_meta)
            .with_params::<OrderMetaParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_order_meta",
            "Create or update an order metadata entry",
            create_order_meta,
        )
        .with_params::<SetOrderMetaParams>(),
    );
}

pub(super) async fn get_orders(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("orders", &params.paging(), "Failed to get orders")
        .await?)
}

async fn get_order(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id_or_alias("order_id", "id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("orders/{}", order_id),
            &Query::new(),
            &format!("Failed to get order {}", order_id),
        )
        .await?)
}

async fn create_order(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("order_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client.post("orders", &data, "Failed to create order").await?)
}

async fn update_order(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let data = Value::Object(params.object("order_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("orders/{}", order_id),
            Some(&data),
            &format!("Failed to update order {}", order_id),
        )
        .await?)
}

async fn delete_order(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("orders/{}", order_id),
            &force(&params, false),
            &format!("Failed to delete order {}", order_id),
        )
        .await?)
}

async fn get_order_notes(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("orders/{}/notes", order_id),
            &Query::new(),
            &format!("Failed to get notes for order {}", order_id),
        )
        .await?)
}

async fn create_order_note(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let note = json!({
        "note": params.str("note")?,
        "customer_note": params.bool_or("customer_note", false),
    });
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            &format!("orders/{}/notes", order_id),
            &note,
            &format!("Failed to create note for order {}", order_id),
        )
        .await?)
}

async fn get_order_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(meta::read_meta(
        &client,
        &format!("orders/{}", order_id),
        params.opt_str("meta_key"),
        &format!("Failed to get order {}", order_id),
    )
    .await?)
}

async fn create_order_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let key = params.str("meta_key")?.to_string();
    let value = params.value("meta_value")?.clone();
    let client = ctx.woocommerce(&params)?;
    Ok(meta::edit_meta(
        &client,
        &format!("orders/{}", order_id),
        &format!("Failed to get order {}", order_id),
        &format!("Failed to update order meta data for order {}", order_id),
        |entries| meta::upsert_meta(entries, &key, value),
    )
    .await?)
}

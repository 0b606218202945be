//! Wrapped list tools kept for older HTTP clients.

use serde_json::{Value, json};

use super::{orders, products};
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new(
            "list_products",
            "List products as {\"products\": [...]}",
            list_products,
        )
        .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "list_orders",
            "List orders as {\"orders\": [...]}",
            list_orders,
        )
        .with_params::<PagingParams>(),
    );
}

async fn list_products(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let products = products::get_products(ctx, params).await?;
    Ok(json!({ "products": products }))
}

async fn list_orders(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let orders = orders::get_orders(ctx, params).await?;
    Ok(json!({ "orders": orders }))
}

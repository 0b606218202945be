//! Order refunds.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use super::orders::OrderIdParams;
use crate::domains::tools::{ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RefundIdParams {
    pub order_id: u64,
    pub refund_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateRefundParams {
    pub order_id: u64,
    /// Refund fields, e.g. `amount`, `reason` and `line_items`.
    pub refund_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteRefundParams {
    pub order_id: u64,
    pub refund_id: u64,
    /// Delete permanently (default: true).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new(
            "get_order_refunds",
            "List the refunds of an order",
            get_order_refunds,
        )
        .with_params::<OrderIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_order_refund", "Get an order refund", get_order_refund)
            .with_params::<RefundIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_order_refund",
            "Refund (part of) an order",
            create_order_refund,
        )
        .with_params::<CreateRefundParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_order_refund",
            "Delete an order refund (permanently by default)",
            delete_order_refund,
        )
        .with_params::<DeleteRefundParams>(),
    );
}

async fn get_order_refunds(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("orders/{}/refunds", order_id),
            &Query::new(),
            &format!("Failed to get refunds for order {}", order_id),
        )
        .await?)
}

async fn get_order_refund(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let refund_id = params.id("refund_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("orders/{}/refunds/{}", order_id, refund_id),
            &Query::new(),
            &format!("Failed to get refund {} for order {}", refund_id, order_id),
        )
        .await?)
}

async fn create_order_refund(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let data = Value::Object(params.object("refund_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            &format!("orders/{}/refunds", order_id),
            &data,
            &format!("Failed to create refund for order {}", order_id),
        )
        .await?)
}

async fn delete_order_refund(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let order_id = params.id("order_id")?;
    let refund_id = params.id("refund_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("orders/{}/refunds/{}", order_id, refund_id),
            &force(&params, true),
            &format!("Failed to delete refund {} for order {}", refund_id, order_id),
        )
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{context_for, params};
    use mockito::Matcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_delete_refund_forces_by_default() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/wp-json/wc/v3/orders/5/refunds/2")
            .match_query(Matcher::UrlEncoded("force".into(), "true".into()))
            .with_status(200)
            .with_body(r#"{"id": 2}"#)
            .create_async()
            .await;

        delete_order_refund(
            context_for(&server.url()),
            params(json!({"order_id": 5, "refund_id": 2})),
        )
        .await
        .unwrap();
        mock.assert_async().await;
    }
}

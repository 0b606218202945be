//! Coupons.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CouponIdParams {
    pub coupon_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCouponParams {
    /// Coupon fields, e.g. `code`, `discount_type` and `amount`.
    pub coupon_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateCouponParams {
    pub coupon_id: u64,
    pub coupon_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCouponParams {
    pub coupon_id: u64,
    /// Delete permanently instead of trashing (default: false).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("get_coupons", "List coupons", get_coupons)
            .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_coupon", "Get a coupon", get_coupon)
            .with_params::<CouponIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_coupon", "Create a coupon", create_coupon)
            .with_params::<CreateCouponParams>(),
    );
    registry.register(
        ToolDescriptor::new("update_coupon", "Update a coupon", update_coupon)
            .with_params::<UpdateCouponParams>(),
    );
    registry.register(
        ToolDescriptor::new("delete_coupon", "Delete a coupon", delete_coupon)
            .with_params::<DeleteCouponParams>(),
    );
}

async fn get_coupons(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("coupons", &params.paging(), "Failed to get coupons")
        .await?)
}

async fn get_coupon(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let coupon_id = params.id("coupon_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("coupons/{}", coupon_id),
            &Query::new(),
            &format!("Failed to get coupon {}", coupon_id),
        )
        .await?)
}

async fn create_coupon(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("coupon_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client.post("coupons", &data, "Failed to create coupon").await?)
}

async fn update_coupon(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let coupon_id = params.id("coupon_id")?;
    let data = Value::Object(params.object("coupon_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("coupons/{}", coupon_id),
            Some(&data),
            &format!("Failed to update coupon {}", coupon_id),
        )
        .await?)
}

async fn delete_coupon(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let coupon_id = params.id("coupon_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("coupons/{}", coupon_id),
            &force(&params, false),
            &format!("Failed to delete coupon {}", coupon_id),
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
    async fn test_create_coupon() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/wp-json/wc/v3/coupons")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({"code": "SUMMER", "amount": "10"})))
            .with_status(201)
            .with_body(r#"{"id": 719, "code": "summer"}"#)
            .create_async()
            .await;

        let value = create_coupon(
            context_for(&server.url()),
            params(json!({"coupon_data": {"code": "SUMMER", "amount": "10"}})),
        )
        .await
        .unwrap();

        assert_eq!(value["id"], 719);
        mock.assert_async().await;
    }
}

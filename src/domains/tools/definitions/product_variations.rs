//! Variations of variable products.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListVariationsParams {
    pub product_id: u64,
    #[serde(flatten)]
    pub paging: PagingParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VariationIdParams {
    pub product_id: u64,
    pub variation_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateVariationParams {
    pub product_id: u64,
    /// Variation fields, e.g. `regular_price` and `attributes`.
    pub variation_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateVariationParams {
    pub product_id: u64,
    pub variation_id: u64,
    pub variation_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteVariationParams {
    pub product_id: u64,
    pub variation_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new(
            "get_product_variations",
            "List the variations of a product",
            get_product_variations,
        )
        .with_params::<ListVariationsParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_product_variation",
            "Get a product variation",
            get_product_variation,
        )
        .with_params::<VariationIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_product_variation",
            "Create a product variation",
            create_product_variation,
        )
        .with_params::<CreateVariationParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_product_variation",
            "Update a product variation",
            update_product_variation,
        )
        .with_params::<UpdateVariationParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_product_variation",
            "Delete a product variation",
            delete_product_variation,
        )
        .with_params::<DeleteVariationParams>(),
    );
}

async fn get_product_variations(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/{}/variations", product_id),
            &params.paging(),
            &format!("Failed to get variations for product {}", product_id),
        )
        .await?)
}

async fn get_product_variation(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let variation_id = params.id("variation_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/{}/variations/{}", product_id, variation_id),
            &Query::new(),
            &format!(
                "Failed to get variation {} for product {}",
                variation_id, product_id
            ),
        )
        .await?)
}

async fn create_product_variation(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let data = Value::Object(params.object("variation_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            &format!("products/{}/variations", product_id),
            &data,
            &format!("Failed to create variation for product {}", product_id),
        )
        .await?)
}

async fn update_product_variation(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let variation_id = params.id("variation_id")?;
    let data = Value::Object(params.object("variation_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/{}/variations/{}", product_id, variation_id),
            Some(&data),
            &format!(
                "Failed to update variation {} for product {}",
                variation_id, product_id
            ),
        )
        .await?)
}

async fn delete_product_variation(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let product_id = params.id("product_id")?;
    let variation_id = params.id("variation_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/{}/variations/{}", product_id, variation_id),
            &force(&params, false),
            &format!(
                "Failed to delete variation {} for product {}",
                variation_id, product_id
            ),
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
    async fn test_create_product_variation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/wp-json/wc/v3/products/3/variations")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({"regular_price": "9.99"})))
            .with_status(201)
            .with_body(r#"{"id": 31, "regular_price": "9.99"}"#)
            .create_async()
            .await;

        let value = create_product_variation(
            context_for(&server.url()),
            params(json!({"product_id": 3, "variation_data": {"regular_price": "9.99"}})),
        )
        .await
        .unwrap();

        assert_eq!(value["id"], 31);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_variation_requires_both_ids() {
        let err = get_product_variation(context_for("http://unused.invalid"), params(json!({"product_id": 3})))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'variation_id'"));
    }
}

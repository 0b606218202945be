//! Product reviews.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListReviewsParams {
    /// Only reviews of this product.
    pub product_id: Option<u64>,
    #[serde(flatten)]
    pub paging: PagingParams,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReviewIdParams {
    pub review_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateReviewParams {
    /// Review fields, e.g. `product_id`, `review`, `reviewer` and `rating`.
    pub review_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateReviewParams {
    pub review_id: u64,
    pub review_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteReviewParams {
    pub review_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new(
            "get_product_reviews",
            "List product reviews, optionally for one product",
            get_product_reviews,
        )
        .with_params::<ListReviewsParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_product_review", "Get a product review", get_product_review)
            .with_params::<ReviewIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_product_review",
            "Create a product review",
            create_product_review,
        )
        .with_params::<CreateReviewParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_product_review",
            "Update a product review",
            update_product_review,
        )
        .with_params::<UpdateReviewParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_product_review",
            "Delete a product review",
            delete_product_review,
        )
        .with_params::<DeleteReviewParams>(),
    );
}

async fn get_product_reviews(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let mut query = params.paging();
    if params.contains("product_id") {
        query.set("product", params.id("product_id")?);
    }
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("products/reviews", &query, "Failed to get product reviews")
        .await?)
}

async fn get_product_review(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let review_id = params.id("review_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/reviews/{}", review_id),
            &Query::new(),
            &format!("Failed to get product review {}", review_id),
        )
        .await?)
}

async fn create_product_review(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("review_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post("products/reviews", &data, "Failed to create product review")
        .await?)
}

async fn update_product_review(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let review_id = params.id("review_id")?;
    let data = Value::Object(params.object("review_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/reviews/{}", review_id),
            Some(&data),
            &format!("Failed to update product review {}", review_id),
        )
        .await?)
}

async fn delete_product_review(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let review_id = params.id("review_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/reviews/{}", review_id),
            &force(&params, false),
            &format!("Failed to delete product review {}", review_id),
        )
        .await?)
}

//! Product tags.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TagIdParams {
    pub tag_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTagParams {
    pub tag_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateTagParams {
    pub tag_id: u64,
    pub tag_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteTagParams {
    pub tag_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("get_product_tags", "List product tags", get_product_tags)
            .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_product_tag", "Get a product tag", get_product_tag)
            .with_params::<TagIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_product_tag", "Create a product tag", create_product_tag)
            .with_params::<CreateTagParams>(),
    );
    registry.register(
        ToolDescriptor::new("update_product_tag", "Update a product tag", update_product_tag)
            .with_params::<UpdateTagParams>(),
    );
    registry.register(
        ToolDescriptor::new("delete_product_tag", "Delete a product tag", delete_product_tag)
            .with_params::<DeleteTagParams>(),
    );
}

async fn get_product_tags(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("products/tags", &params.paging(), "Failed to get product tags")
        .await?)
}

async fn get_product_tag(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let tag_id = params.id("tag_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("products/tags/{}", tag_id),
            &Query::new(),
            &format!("Failed to get product tag {}", tag_id),
        )
        .await?)
}

async fn create_product_tag(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("tag_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post("products/tags", &data, "Failed to create product tag")
        .await?)
}

async fn update_product_tag(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let tag_id = params.id("tag_id")?;
    let data = Value::Object(params.object("tag_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("products/tags/{}", tag_id),
            Some(&data),
            &format!("Failed to update product tag {}", tag_id),
        )
        .await?)
}

async fn delete_product_tag(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let tag_id = params.id("tag_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("products/tags/{}", tag_id),
            &force(&params, false),
            &format!("Failed to delete product tag {}", tag_id),
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
    async fn test_update_product_tag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/wp-json/wc/v3/products/tags/1")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({"name": "brand-new"})))
            .with_status(200)
            .with_body(r#"{"id": 1, "name": "brand-new"}"#)
            .create_async()
            .await;

        let value = update_product_tag(
            context_for(&server.url()),
            params(json!({"tag_id": 1, "tag_data": {"name": "brand-new"}})),
        )
        .await
        .unwrap();

        assert_eq!(value["name"], "brand-new");
        mock.assert_async().await;
    }
}

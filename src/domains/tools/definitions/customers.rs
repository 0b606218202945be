//! Customers and customer metadata.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use super::meta;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

/// Parameters naming one customer. `id` is accepted as an alias.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CustomerIdParams {
    pub customer_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCustomerParams {
    pub customer_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateCustomerParams {
    pub customer_id: u64,
    pub customer_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteCustomerParams {
    pub customer_id: u64,
    /// Delete permanently (default: false).
    pub force: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CustomerMetaParams {
    pub customer_id: u64,
    /// Only return entries with this key.
    pub meta_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SetCustomerMetaParams {
    pub customer_id: u64,
    pub meta_key: String,
    pub meta_value: Value,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("get_customers", "List customers", get_customers)
            .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_customer", "Get a customer by id", get_customer)
            .with_params::<CustomerIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_customer", "Create a customer", create_customer)
            .with_params::<CreateCustomerParams>(),
    );
    registry.register(
        ToolDescriptor::new("update_customer", "Update a customer", update_customer)
            .with_params::<UpdateCustomerParams>(),
    );
    registry.register(
        ToolDescriptor::new("delete_customer", "Delete a customer", delete_customer)
            .with_params::<DeleteCustomerParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_customer_meta",
            "Get customer metadata",
            get_customer_meta,
        )
        .with_params::<CustomerMetaParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_customer_meta",
            "Create or update a customer metadata entry",
            create_customer_meta,
        )
        .with_params::<SetCustomerMetaParams>(),
    );
}

async fn get_customers(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("customers", &params.paging(), "Failed to get customers")
        .await?)
}

async fn get_customer(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let customer_id = params.id_or_alias("customer_id", "id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("customers/{}", customer_id),
            &Query::new(),
            &format!("Failed to get customer {}", customer_id),
        )
        .await?)
}

async fn create_customer(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("customer_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post("customers", &data, "Failed to create customer")
        .await?)
}

async fn update_customer(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let customer_id = params.id("customer_id")?;
    let data = Value::Object(params.object("customer_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("customers/{}", customer_id),
            Some(&data),
            &format!("Failed to update customer {}", customer_id),
        )
        .await?)
}

async fn delete_customer(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let customer_id = params.id("customer_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("customers/{}", customer_id),
            &force(&params, false),
            &format!("Failed to delete customer {}", customer_id),
        )
        .await?)
}

async fn get_customer_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let customer_id = params.id("customer_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(meta::read_meta(
        &client,
        &format!("customers/{}", customer_id),
        params.opt_str("meta_key"),
        &format!("Failed to get customer {}", customer_id),
    )
    .await?)
}

async fn create_customer_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let customer_id = params.id("customer_id")?;
    let key = params.str("meta_key")?.to_string();
    let value = params.value("meta_value")?.clone();
    let client = ctx.woocommerce(&params)?;
    Ok(meta::edit_meta(
        &client,
        &format!("customers/{}", customer_id),
        &format!("Failed to get customer {}", customer_id),
        &format!(
            "Failed to update customer meta data for customer {}",
            customer_id
        ),
        |entries| meta::upsert_meta(entries, &key, value),
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
    async fn test_get_customer_with_id_alias() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/wp-json/wc/v3/customers/25")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id": 25, "email": "a@example.com"}"#)
            .create_async()
            .await;

        let value = get_customer(context_for(&server.url()), params(json!({"id": "25"})))
            .await
            .unwrap();
        assert_eq!(value["email"], "a@example.com");
    }

    #[tokio::test]
    async fn test_create_customer_meta_updates_existing_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/wp-json/wc/v3/customers/25")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id": 25, "meta_data": [{"id": 4, "key": "tier", "value": "silver"}]}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/wp-json/wc/v3/customers/25")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({
                "meta_data": [{"id": 4, "key": "tier", "value": "gold"}]
            })))
            .with_status(200)
            .with_body(r#"{"id": 25, "meta_data": [{"id": 4, "key": "tier", "value": "gold"}]}"#)
            .create_async()
            .await;

        let value = create_customer_meta(
            context_for(&server.url()),
            params(json!({"customer_id": 25, "meta_key": "tier", "meta_value": "gold"})),
        )
        .await
        .unwrap();

        assert_eq!(value[0]["value"], "gold");
        put.assert_async().await;
    }
}

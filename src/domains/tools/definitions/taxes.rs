//! Tax classes and tax rates.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::common::force;
use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTaxClassParams {
    /// Tax class fields; `name` is required by the store.
    pub tax_class_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TaxClassSlugParams {
    pub tax_class_slug: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TaxRateIdParams {
    pub rate_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateTaxRateParams {
    /// Rate fields, e.g. `country`, `rate` and `name`.
    pub rate_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateTaxRateParams {
    pub rate_id: u64,
    pub rate_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteTaxRateParams {
    pub rate_id: u64,
    /// Delete permanently (default: true).
    pub force: Option<bool>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDescriptor::new(
        "get_tax_classes",
        "List tax classes",
        get_tax_classes,
    ));
    registry.register(
        ToolDescriptor::new("create_tax_class", "Create a tax class", create_tax_class)
            .with_params::<CreateTaxClassParams>(),
    );
    registry.register(
        ToolDescriptor::new("delete_tax_class", "Delete a tax class", delete_tax_class)
            .with_params::<TaxClassSlugParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_tax_rates", "List tax rates", get_tax_rates)
            .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_tax_rate", "Get a tax rate", get_tax_rate)
            .with_params::<TaxRateIdParams>(),
    );
    registry.register(
        ToolDescriptor::new("create_tax_rate", "Create a tax rate", create_tax_rate)
            .with_params::<CreateTaxRateParams>(),
    );
    registry.register(
        ToolDescriptor::new("update_tax_rate", "Update a tax rate", update_tax_rate)
            .with_params::<UpdateTaxRateParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_tax_rate",
            "Delete a tax rate (permanently by default)",
            delete_tax_rate,
        )
        .with_params::<DeleteTaxRateParams>(),
    );
}

async fn get_tax_classes(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("taxes/classes", &Query::new(), "Failed to get tax classes")
        .await?)
}

async fn create_tax_class(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("tax_class_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post("taxes/classes", &data, "Failed to create tax class")
        .await?)
}

async fn delete_tax_class(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let slug = params.str("tax_class_slug")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("taxes/classes/{}", slug),
            &Query::new(),
            &format!("Failed to delete tax class {}", slug),
        )
        .await?)
}

async fn get_tax_rates(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("taxes", &params.paging(), "Failed to get tax rates")
        .await?)
}

async fn get_tax_rate(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let rate_id = params.id("rate_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("taxes/{}", rate_id),
            &Query::new(),
            &format!("Failed to get tax rate {}", rate_id),
        )
        .await?)
}

async fn create_tax_rate(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("rate_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client.post("taxes", &data, "Failed to create tax rate").await?)
}

async fn update_tax_rate(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let rate_id = params.id("rate_id")?;
    let data = Value::Object(params.object("rate_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("taxes/{}", rate_id),
            Some(&data),
            &format!("Failed to update tax rate {}", rate_id),
        )
        .await?)
}

async fn delete_tax_rate(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let rate_id = params.id("rate_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("taxes/{}", rate_id),
            &force(&params, true),
            &format!("Failed to delete tax rate {}", rate_id),
        )
        .await?)
}

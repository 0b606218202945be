//! Shipping methods, globally and per zone.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::shipping_zones::ZoneIdParams;
use crate::domains::tools::{ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateZoneMethodParams {
    pub zone_id: u64,
    /// Method fields; `method_id` (e.g. `flat_rate`) is required by the store.
    pub method_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateZoneMethodParams {
    pub zone_id: u64,
    /// Instance id of the method within the zone.
    pub instance_id: u64,
    pub method_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ZoneMethodIdParams {
    pub zone_id: u64,
    pub instance_id: u64,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDescriptor::new(
        "get_shipping_methods",
        "List the available shipping methods",
        get_shipping_methods,
    ));
    registry.register(
        ToolDescriptor::new(
            "get_shipping_zone_methods",
            "List the shipping methods of a zone",
            get_shipping_zone_methods,
        )
        .with_params::<ZoneIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_shipping_zone_method",
            "Add a shipping method to a zone",
            create_shipping_zone_method,
        )
        .with_params::<CreateZoneMethodParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_shipping_zone_method",
            "Update a shipping method of a zone",
            update_shipping_zone_method,
        )
        .with_params::<UpdateZoneMethodParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_shipping_zone_method",
            "Remove a shipping method from a zone",
            delete_shipping_zone_method,
        )
        .with_params::<ZoneMethodIdParams>(),
    );
}

async fn get_shipping_methods(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "shipping_methods",
            &Query::new(),
            "Failed to get shipping methods",
        )
        .await?)
}

async fn get_shipping_zone_methods(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("shipping/zones/{}/methods", zone_id),
            &Query::new(),
            &format!("Failed to get shipping methods for zone {}", zone_id),
        )
        .await?)
}

async fn create_shipping_zone_method(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let data = Value::Object(params.object("method_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post(
            &format!("shipping/zones/{}/methods", zone_id),
            &data,
            &format!("Failed to create shipping method for zone {}", zone_id),
        )
        .await?)
}

async fn update_shipping_zone_method(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let instance_id = params.id("instance_id")?;
    let data = Value::Object(params.object("method_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("shipping/zones/{}/methods/{}", zone_id, instance_id),
            Some(&data),
            &format!(
                "Failed to update shipping method {} for zone {}",
                instance_id, zone_id
            ),
        )
        .await?)
}

async fn delete_shipping_zone_method(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let instance_id = params.id("instance_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("shipping/zones/{}/methods/{}", zone_id, instance_id),
            &Query::new(),
            &format!(
                "Failed to delete shipping method {} for zone {}",
                instance_id, zone_id
            ),
        )
        .await?)
}

//! Shipping zones and their locations.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domains::tools::{ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ZoneIdParams {
    pub zone_id: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateZoneParams {
    /// Zone fields, e.g. `name` and `order`.
    pub zone_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateZoneParams {
    pub zone_id: u64,
    pub zone_data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ZoneLocationsParams {
    pub zone_id: u64,
    /// Replacement list of `{"code", "type"}` locations.
    pub locations: Vec<Value>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDescriptor::new(
        "get_shipping_zones",
        "List shipping zones",
        get_shipping_zones,
    ));
    registry.register(
        ToolDescriptor::new("get_shipping_zone", "Get a shipping zone", get_shipping_zone)
            .with_params::<ZoneIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "create_shipping_zone",
            "Create a shipping zone",
            create_shipping_zone,
        )
        .with_params::<CreateZoneParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_shipping_zone",
            "Update a shipping zone",
            update_shipping_zone,
        )
        .with_params::<UpdateZoneParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "delete_shipping_zone",
            "Delete a shipping zone",
            delete_shipping_zone,
        )
        .with_params::<ZoneIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_shipping_zone_locations",
            "List the locations of a shipping zone",
            get_shipping_zone_locations,
        )
        .with_params::<ZoneIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_shipping_zone_locations",
            "Replace the locations of a shipping zone",
            update_shipping_zone_locations,
        )
        .with_params::<ZoneLocationsParams>(),
    );
}

async fn get_shipping_zones(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("shipping/zones", &Query::new(), "Failed to get shipping zones")
        .await?)
}

async fn get_shipping_zone(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("shipping/zones/{}", zone_id),
            &Query::new(),
            &format!("Failed to get shipping zone {}", zone_id),
        )
        .await?)
}

async fn create_shipping_zone(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let data = Value::Object(params.object("zone_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .post("shipping/zones", &data, "Failed to create shipping zone")
        .await?)
}

async fn update_shipping_zone(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let data = Value::Object(params.object("zone_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("shipping/zones/{}", zone_id),
            Some(&data),
            &format!("Failed to update shipping zone {}", zone_id),
        )
        .await?)
}

async fn delete_shipping_zone(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .delete(
            &format!("shipping/zones/{}", zone_id),
            &Query::new(),
            &format!("Failed to delete shipping zone {}", zone_id),
        )
        .await?)
}

async fn get_shipping_zone_locations(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("shipping/zones/{}/locations", zone_id),
            &Query::new(),
            &format!("Failed to get locations for shipping zone {}", zone_id),
        )
        .await?)
}

async fn update_shipping_zone_locations(
    ctx: ToolContext,
    params: ToolParams,
) -> ToolResult<Value> {
    let zone_id = params.id("zone_id")?;
    let locations = Value::Array(params.array("locations")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("shipping/zones/{}/locations", zone_id),
            Some(&locations),
            &format!("Failed to update locations for shipping zone {}", zone_id),
        )
        .await?)
}

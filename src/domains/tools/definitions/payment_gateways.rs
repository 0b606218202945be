//! Payment gateways.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domains::tools::{ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GatewayIdParams {
    /// Gateway id, e.g. `bacs` or `paypal`.
    pub gateway_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateGatewayParams {
    pub gateway_id: String,
    /// Fields to change, e.g. `enabled` or `settings`.
    pub gateway_data: Map<String, Value>,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDescriptor::new(
        "get_payment_gateways",
        "List payment gateways",
        get_payment_gateways,
    ));
    registry.register(
        ToolDescriptor::new(
            "get_payment_gateway",
            "Get a payment gateway",
            get_payment_gateway,
        )
        .with_params::<GatewayIdParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_payment_gateway",
            "Update the settings of a payment gateway",
            update_payment_gateway,
        )
        .with_params::<UpdateGatewayParams>(),
    );
}

async fn get_payment_gateways(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "payment_gateways",
            &Query::new(),
            "Failed to get payment gateways",
        )
        .await?)
}

async fn get_payment_gateway(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let gateway_id = params.str("gateway_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("payment_gateways/{}", gateway_id),
            &Query::new(),
            &format!("Failed to get payment gateway {}", gateway_id),
        )
        .await?)
}

async fn update_payment_gateway(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let gateway_id = params.str("gateway_id")?;
    let data = Value::Object(params.object("gateway_data")?.clone());
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("payment_gateways/{}", gateway_id),
            Some(&data),
            &format!("Failed to update payment gateway {}", gateway_id),
        )
        .await?)
}

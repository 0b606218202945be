//! Reference data: countries, states and currencies.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::domains::tools::{ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CountryParams {
    /// ISO 3166-1 alpha-2 code, e.g. `IL`.
    pub country: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CurrencyParams {
    /// ISO 4217 code, e.g. `USD`.
    pub currency: String,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(ToolDescriptor::new(
        "get_countries",
        "List countries and their states",
        get_countries,
    ));
    registry.register(
        ToolDescriptor::new(
            "get_country_states",
            "Get a country and its states",
            get_country_states,
        )
        .with_params::<CountryParams>(),
    );
    registry.register(ToolDescriptor::new(
        "get_currencies",
        "List supported currencies",
        get_currencies,
    ));
    registry.register(
        ToolDescriptor::new("get_currency", "Get a currency by code", get_currency)
            .with_params::<CurrencyParams>(),
    );
    registry.register(ToolDescriptor::new(
        "get_current_currency",
        "Get the store's current currency",
        get_current_currency,
    ));
}

async fn get_countries(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("data/countries", &Query::new(), "Failed to get countries")
        .await?)
}

async fn get_country_states(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let country = params.str("country")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("data/countries/{}", country),
            &Query::new(),
            &format!("Failed to get states for country {}", country),
        )
        .await?)
}

async fn get_currencies(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("data/currencies", &Query::new(), "Failed to get currencies")
        .await?)
}

async fn get_currency(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let currency = params.str("currency")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("data/currencies/{}", currency),
            &Query::new(),
            &format!("Failed to get currency {}", currency),
        )
        .await?)
}

async fn get_current_currency(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "data/currencies/current",
            &Query::new(),
            "Failed to get current currency",
        )
        .await?)
}

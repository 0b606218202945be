//! Store settings and system status.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domains::tools::{ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SettingsParams {
    /// Settings group, e.g. `general`; lists the groups when absent.
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SettingOptionParams {
    pub group: String,
    /// Option id, e.g. `woocommerce_currency`.
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateSettingOptionParams {
    pub group: String,
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SystemStatusToolParams {
    /// Tool id, e.g. `clear_transients`.
    pub tool_id: String,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new(
            "get_settings",
            "List settings groups, or the options of one group",
            get_settings,
        )
        .with_params::<SettingsParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_setting_options",
            "Get a single setting option",
            get_setting_options,
        )
        .with_params::<SettingOptionParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "update_setting_option",
            "Set the value of a setting option",
            update_setting_option,
        )
        .with_params::<UpdateSettingOptionParams>(),
    );
    registry.register(ToolDescriptor::new(
        "get_system_status",
        "Get the store's system status report",
        get_system_status,
    ));
    registry.register(ToolDescriptor::new(
        "get_system_status_tools",
        "List the system status tools",
        get_system_status_tools,
    ));
    registry.register(
        ToolDescriptor::new(
            "run_system_status_tool",
            "Run a system status tool",
            run_system_status_tool,
        )
        .with_params::<SystemStatusToolParams>(),
    );
}

async fn get_settings(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let path = match params.opt_str("group") {
        Some(group) => format!("settings/{}", group),
        None => "settings".to_string(),
    };
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(&path, &Query::new(), "Failed to get settings")
        .await?)
}

async fn get_setting_options(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let group = params.str("group")?;
    let id = params.str("id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            &format!("settings/{}/{}", group, id),
            &Query::new(),
            &format!("Failed to get setting options for {}/{}", group, id),
        )
        .await?)
}

async fn update_setting_option(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let group = params.str("group")?;
    let id = params.str("id")?;
    let body = json!({ "value": params.value("value")? });
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("settings/{}/{}", group, id),
            Some(&body),
            &format!("Failed to update setting option {}/{}", group, id),
        )
        .await?)
}

async fn get_system_status(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("system_status", &Query::new(), "Failed to get system status")
        .await?)
}

async fn get_system_status_tools(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "system_status/tools",
            &Query::new(),
            "Failed to get system status tools",
        )
        .await?)
}

async fn run_system_status_tool(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let tool_id = params.str("tool_id")?;
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .put(
            &format!("system_status/tools/{}", tool_id),
            None,
            &format!("Failed to run system status tool {}", tool_id),
        )
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{context_for, params};
    use mockito::Matcher;

    #[tokio::test]
    async fn test_get_settings_for_group() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wp-json/wc/v3/settings/general")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"id": "woocommerce_currency", "value": "ILS"}]"#)
            .create_async()
            .await;

        let value = get_settings(context_for(&server.url()), params(json!({"group": "general"})))
            .await
            .unwrap();

        assert_eq!(value[0]["value"], "ILS");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_setting_option_wraps_value() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/wp-json/wc/v3/settings/general/woocommerce_currency")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({"value": "USD"})))
            .with_status(200)
            .with_body(r#"{"id": "woocommerce_currency", "value": "USD"}"#)
            .create_async()
            .await;

        update_setting_option(
            context_for(&server.url()),
            params(json!({"group": "general", "id": "woocommerce_currency", "value": "USD"})),
        )
        .await
        .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_system_status_tool() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/wp-json/wc/v3/system_status/tools/clear_transients")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"id": "clear_transients", "success": true}"#)
            .create_async()
            .await;

        let value = run_system_status_tool(
            context_for(&server.url()),
            params(json!({"tool_id": "clear_transients"})),
        )
        .await
        .unwrap();

        assert_eq!(value["success"], true);
        mock.assert_async().await;
    }
}

//! Sales, product, customer and stock reports.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domains::tools::{
    PagingParams, ToolContext, ToolDescriptor, ToolParams, ToolRegistry, ToolResult,
};
use crate::store::Query;

/// Reporting window.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PeriodParams {
    /// `week`, `month`, `last_month` or `year` (default: `month`).
    pub period: Option<String>,
    /// Start date, `YYYY-MM-DD`.
    pub date_min: Option<String>,
    /// End date, `YYYY-MM-DD`.
    pub date_max: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SalesReportParams {
    #[serde(flatten)]
    pub period: PeriodParams,
    pub filters: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProductsReportParams {
    #[serde(flatten)]
    pub period: PeriodParams,
    #[serde(flatten)]
    pub paging: PagingParams,
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("get_sales_report", "Get the sales report", get_sales_report)
            .with_params::<SalesReportParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_products_report",
            "Get the top sellers report",
            get_products_report,
        )
        .with_params::<ProductsReportParams>(),
    );
    registry.register(
        ToolDescriptor::new(
            "get_customers_report",
            "Get the customers report",
            get_customers_report,
        )
        .with_params::<PagingParams>(),
    );
    registry.register(
        ToolDescriptor::new("get_stock_report", "Get the stock report", get_stock_report)
            .with_params::<PagingParams>(),
    );
}

/// `period` (default `month`), paging when `paged`, the filters, then the
/// optional date bounds.
fn period_query(params: &ToolParams, paged: bool) -> Query {
    let mut query = Query::new().with("period", params.opt_str("period").unwrap_or("month"));
    if paged {
        query
            .set("per_page", params.u64_or("per_page", 10))
            .set("page", params.u64_or("page", 1));
    }
    if let Some(filters) = params.filters() {
        query.merge_object(filters);
    }
    for key in ["date_min", "date_max"] {
        if let Some(date) = params.opt_str(key) {
            query.set(key, date);
        }
    }
    query
}

async fn get_sales_report(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let query = period_query(&params, false);
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("reports/sales", &query, "Failed to get sales report")
        .await?)
}

async fn get_products_report(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let query = period_query(&params, true);
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("reports/products", &query, "Failed to get products report")
        .await?)
}

async fn get_customers_report(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get(
            "reports/customers",
            &params.paging(),
            "Failed to get customers report",
        )
        .await?)
}

async fn get_stock_report(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let client = ctx.woocommerce(&params)?;
    Ok(client
        .get("reports/stock", &params.paging(), "Failed to get stock report")
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::test_support::{context_for, params};
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_period_query_defaults_to_month() {
        let query = period_query(&params(json!({})), false);
        assert_eq!(query.get("period"), Some("month"));
        assert_eq!(query.get("date_min"), None);
    }

    #[test]
    fn test_period_query_dates_override_filters() {
        let query = period_query(
            &params(json!({
                "period": "week",
                "date_min": "2024-01-01",
                "filters": {"date_min": "2000-01-01", "status": "completed"}
            })),
            false,
        );
        assert_eq!(query.get("period"), Some("week"));
        assert_eq!(query.get("date_min"), Some("2024-01-01"));
        assert_eq!(query.get("status"), Some("completed"));
    }

    #[tokio::test]
    async fn test_get_products_report_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wp-json/wc/v3/reports/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("period".into(), "year".into()),
                Matcher::UrlEncoded("per_page".into(), "10".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"[{"product_id": 1, "quantity": 12}]"#)
            .create_async()
            .await;

        let value = get_products_report(context_for(&server.url()), params(json!({"period": "year"})))
            .await
            .unwrap();

        assert_eq!(value[0]["quantity"], 12);
        mock.assert_async().await;
    }
}

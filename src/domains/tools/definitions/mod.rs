//! Tool definitions module.
//!
//! One file per store resource. Each exposes a `register()` that adds its
//! tools to the registry; [`register_all`] runs them in a fixed order.

mod common;
mod meta;

pub mod coupons;
pub mod customers;
pub mod data;
pub mod legacy;
pub mod order_refunds;
pub mod orders;
pub mod payment_gateways;
pub mod product_attributes;
pub mod product_categories;
pub mod product_reviews;
pub mod product_tags;
pub mod product_variations;
pub mod products;
pub mod reports;
pub mod settings;
pub mod shipping_methods;
pub mod shipping_zones;
pub mod taxes;
pub mod wordpress;

use super::registry::ToolRegistry;

/// Register every resource tool.
pub fn register_all(registry: &mut ToolRegistry) {
    wordpress::register(registry);
    products::register(registry);
    product_categories::register(registry);
    product_tags::register(registry);
    product_attributes::register(registry);
    product_variations::register(registry);
    product_reviews::register(registry);
    orders::register(registry);
    order_refunds::register(registry);
    shipping_zones::register(registry);
    shipping_methods::register(registry);
    taxes::register(registry);
    coupons::register(registry);
    payment_gateways::register(registry);
    settings::register(registry);
    data::register(registry);
    customers::register(registry);
    reports::register(registry);
    legacy::register(registry);
}


#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::{Map, Value, json};

    use super::test_support::{context_for, params};
    use crate::domains::tools::{TOOLS_LIST, ToolError, ToolRegistry};

    fn sample(kind: &str) -> Value {
        match kind {
            "integer" => json!(1),
            "boolean" => json!(false),
            "object" => json!({}),
            "array" => json!([]),
            _ => json!("x"),
        }
    }

    // Every handler must run with just the required arguments its schema lists.
    #[tokio::test]
    async fn test_required_schema_arguments_satisfy_handlers() {
        let mut server = mockito::Server::new_async().await;
        for method in ["GET", "POST", "PUT", "DELETE"] {
            server
                .mock(method, Matcher::Any)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body("{}")
                .create_async()
                .await;
        }

        let registry = ToolRegistry::with_defaults();
        for tool in registry.descriptors().filter(|t| t.name() != TOOLS_LIST) {
            let args: Map<String, Value> = tool
                .params()
                .into_iter()
                .filter(|p| p.required)
                .map(|p| (p.name, sample(&p.kind)))
                .collect();

            let result = tool
                .handler()
                .call(context_for(&server.url()), params(Value::Object(args)))
                .await;
            if let Err(ToolError::InvalidArguments(message)) = &result {
                assert!(
                    !message.starts_with("Missing or invalid"),
                    "{}: {}",
                    tool.name(),
                    message
                );
            }
        }
    }
}

//! Tools domain module.
//!
//! Every WooCommerce/WordPress operation the server offers is a tool: a
//! named async handler registered in the [`ToolRegistry`] and executed by
//! the [`Dispatcher`].
//!
//! ## Architecture
//!
//! - `definitions/` - Tool implementations, one file per store resource
//! - `registry.rs` - Name-to-descriptor table and the `tools_list` catalog
//! - `dispatcher.rs` - Runs a call and turns failures into results
//! - `router.rs` - rmcp ToolRouter built from the registry (STDIO)
//! - `params.rs` - Validated parameter access and the shared parameter shapes
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Write an `async fn(ToolContext, ToolParams) -> ToolResult<Value>` in
//!    the resource's file under `definitions/`
//! 2. Derive `Deserialize` and `JsonSchema` on a `...Params` struct for its
//!    arguments
//! 3. Register it in that file's `register()` with `.with_params::<P>()`
//!
//! Both transports pick it up from the registry.

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod params;
mod registry;
pub mod router;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, ToolError};
pub use handlers::*;
pub use params::{
    NoParams, PagingParams, ToolParams, WooCommerceCredentials, WordPressCredentials,
};
pub use registry::{CredentialScope, ParamSummary, TOOLS_LIST, ToolDescriptor, ToolRegistry};
pub use router::build_tool_router;

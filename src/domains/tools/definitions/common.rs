//! Shorthands shared by the tool definitions.

use crate::domains::tools::ToolParams;
use crate::store::Query;

/// `force=<bool>` query for delete calls.
pub(super) fn force(params: &ToolParams, default: bool) -> Query {
    Query::new().with("force", params.bool_or("force", default))
}

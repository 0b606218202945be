//! WordPress posts and post metadata (`wp/v2`, basic auth).

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domains::tools::{
    CredentialScope, ToolContext, ToolDescriptor, ToolError, ToolParams, ToolRegistry,
    ToolResult,
};
use crate::store::Query;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    /// Post status (default: `draft`).
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPostsParams {
    /// Results per page (default: 10).
    pub per_page: Option<u64>,
    /// Page number (default: 1).
    pub page: Option<u64>,
}

/// At least one of `title`, `content` or `status` must be given.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdatePostParams {
    pub post_id: u64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PostMetaParams {
    pub post_id: u64,
    /// Only return entries with this key.
    pub meta_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePostMetaParams {
    pub post_id: u64,
    pub meta_key: String,
    pub meta_value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdatePostMetaParams {
    pub post_id: u64,
    pub meta_id: u64,
    pub meta_value: Value,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PostMetaIdParams {
    pub post_id: u64,
    pub meta_id: u64,
}

pub fn register(registry: &mut ToolRegistry) {
    let tools = [
        ToolDescriptor::new("create_post", "Create a WordPress post", create_post)
            .with_params::<CreatePostParams>(),
        ToolDescriptor::new("get_posts", "List WordPress posts", get_posts)
            .with_params::<ListPostsParams>(),
        ToolDescriptor::new(
            "update_post",
            "Update the title, content or status of a WordPress post",
            update_post,
        )
        .with_params::<UpdatePostParams>(),
        ToolDescriptor::new("get_post_meta", "Get metadata of a WordPress post", get_post_meta)
            .with_params::<PostMetaParams>(),
        ToolDescriptor::new(
            "create_post_meta",
            "Add a metadata entry to a WordPress post",
            create_post_meta,
        )
        .with_params::<CreatePostMetaParams>(),
        ToolDescriptor::new(
            "update_post_meta",
            "Update a metadata entry of a WordPress post",
            update_post_meta,
        )
        .with_params::<UpdatePostMetaParams>(),
        ToolDescriptor::new(
            "delete_post_meta",
            "Delete a metadata entry of a WordPress post",
            delete_post_meta,
        )
        .with_params::<PostMetaIdParams>(),
    ];

    for tool in tools {
        registry.register(tool.with_scope(CredentialScope::WordPress));
    }
}

async fn create_post(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let body = json!({
        "title": params.str("title")?,
        "content": params.str("content")?,
        "status": params.opt_str("status").unwrap_or("draft"),
    });
    let client = ctx.wordpress(&params)?;
    Ok(client.post("posts", &body, "Failed to create post").await?)
}

async fn get_posts(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let query = Query::new()
        .with("per_page", params.u64_or("per_page", 10))
        .with("page", params.u64_or("page", 1));
    let client = ctx.wordpress(&params)?;
    Ok(client.get("posts", &query, "Failed to get posts").await?)
}

async fn update_post(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let post_id = params.id("post_id")?;

    let mut body = Map::new();
    for key in ["title", "content", "status"] {
        if let Some(value) = params.opt_str(key) {
            body.insert(key.to_string(), json!(value));
        }
    }
    if body.is_empty() {
        return Err(ToolError::invalid_arguments(
            "At least one of 'title', 'content' or 'status' is required",
        ));
    }

    let client = ctx.wordpress(&params)?;
    Ok(client
        .post(
            &format!("posts/{}", post_id),
            &Value::Object(body),
            &format!("Failed to update post {}", post_id),
        )
        .await?)
}

async fn get_post_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let post_id = params.id("post_id")?;
    let client = ctx.wordpress(&params)?;

    // the post lookup turns an unknown id into a clean "invalid post" error
    client
        .get(
            &format!("posts/{}", post_id),
            &Query::new(),
            &format!("Failed to get post {}", post_id),
        )
        .await?;

    let meta = client
        .get(
            &format!("posts/{}/meta", post_id),
            &Query::new(),
            &format!("Failed to get post meta for post {}", post_id),
        )
        .await?;

    Ok(match (params.opt_str("meta_key"), meta) {
        (Some(key), Value::Array(entries)) => Value::Array(
            entries
                .into_iter()
                .filter(|entry| entry.get("key").and_then(Value::as_str) == Some(key))
                .collect(),
        ),
        (_, meta) => meta,
    })
}

async fn create_post_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let post_id = params.id("post_id")?;
    let body = json!({
        "key": params.str("meta_key")?,
        "value": params.value("meta_value")?,
    });
    let client = ctx.wordpress(&params)?;
    Ok(client
        .post(
            &format!("posts/{}/meta", post_id),
            &body,
            &format!("Failed to create meta for post {}", post_id),
        )
        .await?)
}

async fn update_post_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let post_id = params.id("post_id")?;
    let meta_id = params.id("meta_id")?;
    let body = json!({ "value": params.value("meta_value")? });
    let client = ctx.wordpress(&params)?;
    Ok(client
        .post(
            &format!("posts/{}/meta/{}", post_id, meta_id),
            &body,
            &format!("Failed to update meta {} for post {}", meta_id, post_id),
        )
        .await?)
}

async fn delete_post_meta(ctx: ToolContext, params: ToolParams) -> ToolResult<Value> {
    let post_id = params.id("post_id")?;
    let meta_id = params.id("meta_id")?;
    let client = ctx.wordpress(&params)?;
    Ok(client
        .delete(
            &format!("posts/{}/meta/{}", post_id, meta_id),
            &Query::new(),
            &format!("Failed to delete meta {} for post {}", meta_id, post_id),
        )
        .await?)
}

//! Comment tool execution handlers.
//!
//! Comments are read and written straight through; they are never cached.

use super::super::ToolResult;
use super::{find_gist, json_result};
use crate::github::DocumentClientExt;
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{AddCommentArgs, DeleteCommentArgs, GistIdArgs, parse_args};
use crate::models::GistComment;
use crate::{Error, Result};
use serde_json::{Value, json};

/// Executes the `list_gist_comments` tool.
pub fn execute_list_gist_comments(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;
    find_gist(ctx, &args.id)?;

    let comments: Vec<GistComment> = ctx
        .client
        .get_json(&format!("/{}/comments", args.id), &[])?;
    let comments: Vec<Value> = comments
        .iter()
        .map(|comment| {
            json!({
                "id": comment.id,
                "body": comment.body,
                "user": comment.user.as_ref().map(|user| user.login.clone()),
                "created_at": comment.created_at,
                "updated_at": comment.updated_at,
            })
        })
        .collect();

    json_result(&json!({
        "gist_id": args.id,
        "count": comments.len(),
        "comments": comments,
    }))
}

/// Executes the `add_gist_comment` tool.
pub fn execute_add_gist_comment(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: AddCommentArgs = parse_args(arguments)?;
    let body = args.body.trim();
    if body.is_empty() {
        return Err(Error::InvalidInput(
            "Comment body is required and cannot be empty".to_string(),
        ));
    }
    find_gist(ctx, &args.id)?;

    let comment: GistComment = ctx
        .client
        .post_json(&format!("/{}/comments", args.id), &json!({ "body": body }))?;
    tracing::info!(gist_id = %args.id, comment_id = comment.id, "Added gist comment");

    json_result(&json!({
        "gist_id": args.id,
        "comment_id": comment.id,
        "message": "Comment added successfully",
    }))
}

/// Executes the `delete_gist_comment` tool.
pub fn execute_delete_gist_comment(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: DeleteCommentArgs = parse_args(arguments)?;
    find_gist(ctx, &args.gist_id)?;

    ctx.client
        .delete(&format!("/{}/comments/{}", args.gist_id, args.comment_id))?;
    tracing::info!(gist_id = %args.gist_id, comment_id = %args.comment_id, "Deleted gist comment");

    json_result(&json!({
        "gist_id": args.gist_id,
        "comment_id": args.comment_id,
        "message": "Comment deleted successfully",
    }))
}

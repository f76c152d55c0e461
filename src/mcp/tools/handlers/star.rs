//! Star tool execution handlers.

use super::super::ToolResult;
use super::{summary_listing, text_result};
use crate::github::DocumentClientExt;
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{GistIdArgs, NoArgs, parse_args};
use crate::models::Gist;
use crate::Result;
use serde_json::Value;

/// Executes the `list_starred_gists` tool.
pub fn execute_list_starred_gists(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let NoArgs {} = parse_args(arguments)?;
    let gists = ctx.starred.get_all(false)?;
    summary_listing(&gists)
}

/// Executes the `star_gist` tool.
///
/// The starred store receives the owned copy when cached, otherwise a live
/// copy from the remote service.
pub fn execute_star_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;
    let path = format!("/{}", args.id);

    ctx.client.put(&format!("{path}/star"))?;
    tracing::info!(gist_id = %args.id, "Starred gist");

    let gist = match ctx.gists.find(&args.id).ok().flatten() {
        Some(gist) => gist,
        None => ctx.client.get_json::<Gist>(&path, &[])?,
    };
    ctx.starred.add(gist);

    Ok(text_result("Gist starred successfully"))
}

/// Executes the `unstar_gist` tool.
pub fn execute_unstar_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;

    ctx.client.delete(&format!("/{}/star", args.id))?;
    tracing::info!(gist_id = %args.id, "Unstarred gist");

    ctx.starred.remove(&args.id);

    Ok(text_result("Gist unstarred successfully"))
}

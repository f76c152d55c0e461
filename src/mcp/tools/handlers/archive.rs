//! Archive tool execution handlers.
//!
//! A gist is archived when its description ends with ` [Archived]`.

use super::super::ToolResult;
use super::{find_gist, patch_gist, summary_listing, text_result};
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{GistIdArgs, NoArgs, parse_args};
use crate::models::{
    archived_description, is_archived_gist, is_daily_note_gist, unarchived_description,
};
use crate::{Error, Result};
use serde_json::{Value, json};

/// Executes the `list_archived_gists` tool.
pub fn execute_list_archived_gists(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let NoArgs {} = parse_args(arguments)?;
    let gists = ctx.gists.get_all(false)?;
    summary_listing(gists.iter().filter(|g| is_archived_gist(g)))
}

/// Executes the `archive_gist` tool.
pub fn execute_archive_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;
    let gist = find_gist(ctx, &args.id)?;

    if is_daily_note_gist(&gist) {
        return Err(Error::InvalidInput("Cannot archive daily notes".to_string()));
    }
    if is_archived_gist(&gist) {
        return Err(Error::InvalidInput("Gist is already archived".to_string()));
    }

    patch_gist(
        ctx,
        &args.id,
        &json!({ "description": archived_description(&gist.description) }),
    )?;

    Ok(text_result("Gist archived successfully"))
}

/// Executes the `unarchive_gist` tool.
pub fn execute_unarchive_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;
    let gist = find_gist(ctx, &args.id)?;

    if !is_archived_gist(&gist) {
        return Err(Error::InvalidInput("Gist is not archived".to_string()));
    }

    patch_gist(
        ctx,
        &args.id,
        &json!({ "description": unarchived_description(&gist.description) }),
    )?;

    Ok(text_result("Gist unarchived successfully"))
}

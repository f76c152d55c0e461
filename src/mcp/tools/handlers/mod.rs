//! Tool execution handlers.
//!
//! This module contains the execution logic for all MCP tools, organized
//! into submodules by tool group. Every mutating handler calls the remote
//! service first and then feeds the returned gist into the matching store.

mod archive;
mod comments;
mod daily;
mod files;
mod gists;
mod prompts;
mod refresh;
mod star;

pub use archive::{execute_archive_gist, execute_list_archived_gists, execute_unarchive_gist};
pub use comments::{
    execute_add_gist_comment, execute_delete_gist_comment, execute_list_gist_comments,
};
pub use daily::{
    execute_delete_daily_note, execute_get_daily_note, execute_get_todays_note,
    execute_list_daily_notes, execute_update_todays_note,
};
pub use files::{
    execute_add_gist_file, execute_delete_gist_file, execute_edit_gist_file,
    execute_rename_gist_file, execute_update_gist_file,
};
pub use gists::{
    execute_create_gist, execute_delete_gist, execute_duplicate_gist, execute_get_gist,
    execute_list_gists, execute_update_gist_description,
};
pub use prompts::{execute_add_prompt, execute_delete_prompt};
pub use refresh::execute_refresh_gists;
pub use star::{execute_list_starred_gists, execute_star_gist, execute_unstar_gist};

use crate::github::DocumentClientExt;
use crate::mcp::context::GistContext;
use crate::models::{Gist, GistSummary};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Value, json};

use super::{ToolContent, ToolResult};

/// Looks up a gist in the owned cache.
fn find_gist(ctx: &GistContext, id: &str) -> Result<Gist> {
    ctx.gists
        .find(id)?
        .ok_or_else(|| Error::NotFound(format!("Gist with ID \"{id}\" not found")))
}

/// Patches a gist and pushes the result into the owned store.
fn patch_gist(ctx: &GistContext, id: &str, body: &Value) -> Result<Gist> {
    let gist: Gist = ctx.client.patch_json(&format!("/{id}"), body)?;
    ctx.gists.update(gist.clone());
    Ok(gist)
}

/// Patches a single file entry. A `null` patch deletes the file.
fn patch_gist_file(ctx: &GistContext, id: &str, filename: &str, patch: Value) -> Result<Gist> {
    let mut files = serde_json::Map::new();
    files.insert(filename.to_string(), patch);
    patch_gist(ctx, id, &json!({ "files": files }))
}

/// Creates a gist and returns the remote copy.
fn create_gist(ctx: &GistContext, description: &str, public: bool, files: Value) -> Result<Gist> {
    ctx.client.post_json(
        "",
        &json!({
            "description": description,
            "public": public,
            "files": files,
        }),
    )
}

/// Builds a `{count, gists}` listing of gist summaries.
fn summary_listing<'a>(gists: impl IntoIterator<Item = &'a Gist>) -> Result<ToolResult> {
    let gists: Vec<GistSummary> = gists.into_iter().map(GistSummary::from).collect();
    json_result(&json!({
        "count": gists.len(),
        "gists": gists,
    }))
}

fn text_result(text: impl Into<String>) -> ToolResult {
    ToolResult {
        content: vec![ToolContent::Text { text: text.into() }],
        is_error: false,
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<ToolResult> {
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "encode_tool_result".to_string(),
        cause: e.to_string(),
    })?;
    Ok(text_result(text))
}

//! Gist tool execution handlers.
//!
//! list, get, create, delete, update description, duplicate.

use super::super::ToolResult;
use super::{create_gist, find_gist, json_result, patch_gist, text_result};
use crate::github::DocumentClientExt;
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{CreateGistArgs, GistIdArgs, NoArgs, UpdateDescriptionArgs, parse_args};
use crate::models::{
    Gist, GistSummary, gist_content, gistpad_share_url, gistpad_url, is_archived_gist,
    is_content_loaded, is_daily_note_gist, is_prompt_gist,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Default filename of a gist created by `create_gist`.
const DEFAULT_FILENAME: &str = "README.md";

/// A gist entry in the `list_gists` output.
#[derive(Debug, Serialize)]
struct GistListEntry {
    id: String,
    description: String,
    files: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    public: bool,
    url: String,
    share_url: String,
}

impl From<&Gist> for GistListEntry {
    fn from(gist: &Gist) -> Self {
        Self {
            id: gist.id.clone(),
            description: gist.description.clone(),
            files: gist.filenames(),
            created_at: gist.created_at,
            updated_at: gist.updated_at,
            public: gist.public,
            url: gistpad_url(&gist.id),
            share_url: gistpad_share_url(&gist.id),
        }
    }
}

/// Executes the `list_gists` tool.
pub fn execute_list_gists(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let NoArgs {} = parse_args(arguments)?;

    let gists: Vec<GistListEntry> = ctx
        .gists
        .get_all(false)?
        .iter()
        .filter(|g| !is_daily_note_gist(g) && !is_archived_gist(g) && !is_prompt_gist(g))
        .map(GistListEntry::from)
        .collect();

    json_result(&json!({
        "count": gists.len(),
        "gists": gists,
    }))
}

/// Executes the `get_gist` tool.
///
/// Always reads the gist from the remote service.
pub fn execute_get_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;

    let gist: Gist = ctx.client.get_json(&format!("/{}", args.id), &[])?;
    ctx.gists.update(gist.clone());

    json_result(&GistSummary::from(&gist))
}

/// Executes the `create_gist` tool.
pub fn execute_create_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: CreateGistArgs = parse_args(arguments)?;
    let filename = args
        .filename
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

    let mut files = serde_json::Map::new();
    files.insert(
        filename.clone(),
        json!({ "content": gist_content(&args.content) }),
    );
    let gist = create_gist(ctx, &args.description, args.public, Value::Object(files))?;
    tracing::info!(gist_id = %gist.id, "Created gist");

    let result = json!({
        "id": gist.id,
        "url": gistpad_url(&gist.id),
        "description": args.description,
        "filename": filename,
    });
    ctx.gists.add(gist);

    json_result(&result)
}

/// Executes the `delete_gist` tool.
pub fn execute_delete_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;

    ctx.client.delete(&format!("/{}", args.id))?;
    tracing::info!(gist_id = %args.id, "Deleted gist");

    ctx.gists.remove(&args.id);
    ctx.starred.remove(&args.id);

    Ok(text_result("Successfully deleted gist"))
}

/// Executes the `update_gist_description` tool.
pub fn execute_update_gist_description(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateDescriptionArgs = parse_args(arguments)?;

    let gist = patch_gist(ctx, &args.id, &json!({ "description": args.description }))?;

    json_result(&json!({
        "id": gist.id,
        "description": gist.description,
        "message": "Successfully updated gist description",
    }))
}

/// Executes the `duplicate_gist` tool.
pub fn execute_duplicate_gist(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: GistIdArgs = parse_args(arguments)?;

    let source = ctx.gists.ensure_content_loaded(find_gist(ctx, &args.id)?)?;
    if !is_content_loaded(&source) {
        return Err(Error::OperationFailed {
            operation: "duplicate_gist".to_string(),
            cause: format!("content of gist \"{}\" could not be loaded", source.id),
        });
    }

    let description = format!("{} (Copy)", source.description).trim().to_string();
    let files: serde_json::Map<String, Value> = source
        .files
        .iter()
        .map(|(name, file)| {
            let content = file.content.as_deref().unwrap_or_default();
            (name.clone(), json!({ "content": gist_content(content) }))
        })
        .collect();

    let copy = create_gist(ctx, &description, source.public, Value::Object(files))?;
    tracing::info!(source_id = %source.id, gist_id = %copy.id, "Duplicated gist");

    let result = json!({
        "source_id": source.id,
        "new_id": copy.id,
        "description": description,
        "files": copy.filenames(),
        "message": "Successfully duplicated gist",
    });
    ctx.gists.add(copy);

    json_result(&result)
}

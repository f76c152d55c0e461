//! File tool execution handlers.
//!
//! add, update, edit (find/replace), delete, rename.

use super::super::ToolResult;
use super::{find_gist, patch_gist_file, text_result};
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{
    EditFileArgs, FileArgs, FileContentArgs, RenameFileArgs, parse_args,
};
use crate::models::{Gist, gist_content};
use crate::{Error, Result};
use serde_json::{Value, json};

/// Checks that a gist is cached and that files do or do not exist in it.
fn assert_gist_file(
    ctx: &GistContext,
    id: &str,
    exists: Option<&str>,
    not_exists: Option<&str>,
) -> Result<Gist> {
    let gist = find_gist(ctx, id)?;

    if let Some(filename) = exists
        && !gist.files.contains_key(filename)
    {
        return Err(Error::NotFound(format!("File \"{filename}\" not found in gist")));
    }
    if let Some(filename) = not_exists
        && gist.files.contains_key(filename)
    {
        return Err(Error::InvalidInput(format!(
            "File \"{filename}\" already exists in gist"
        )));
    }

    Ok(gist)
}

/// Executes the `update_gist_file` tool.
pub fn execute_update_gist_file(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: FileContentArgs = parse_args(arguments)?;
    assert_gist_file(ctx, &args.id, Some(&args.filename), None)?;

    patch_gist_file(
        ctx,
        &args.id,
        &args.filename,
        json!({ "content": gist_content(&args.content) }),
    )?;

    Ok(text_result("File updated successfully"))
}

/// Executes the `add_gist_file` tool.
pub fn execute_add_gist_file(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: FileContentArgs = parse_args(arguments)?;
    assert_gist_file(ctx, &args.id, None, Some(&args.filename))?;

    patch_gist_file(
        ctx,
        &args.id,
        &args.filename,
        json!({ "content": gist_content(&args.content) }),
    )?;

    Ok(text_result("File added successfully"))
}

/// Replaces `old` with `new` in `content`.
///
/// Returns the new content and the number of replaced occurrences.
fn replace_in_content(
    content: &str,
    old: &str,
    new: &str,
    replace_all: bool,
) -> Result<(String, usize)> {
    if old == new {
        return Err(Error::InvalidInput(
            "old_string and new_string must be different".to_string(),
        ));
    }

    let occurrences = if old.is_empty() {
        0
    } else {
        content.matches(old).count()
    };

    match occurrences {
        0 => Err(Error::InvalidInput("old_string not found in file".to_string())),
        1 => Ok((content.replacen(old, new, 1), 1)),
        n if replace_all => Ok((content.replace(old, new), n)),
        n => Err(Error::InvalidInput(format!(
            "Found {n} occurrences of old_string in file. Provide more surrounding context to make it unique, or set replace_all to true."
        ))),
    }
}

/// Executes the `edit_gist_file` tool.
///
/// The gist content is loaded first when the cache only holds a summary.
/// The store is updated only after the patch succeeds.
pub fn execute_edit_gist_file(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: EditFileArgs = parse_args(arguments)?;
    let gist = assert_gist_file(ctx, &args.id, Some(&args.filename), None)?;

    if args.old_string == args.new_string {
        return Err(Error::InvalidInput(
            "old_string and new_string must be different".to_string(),
        ));
    }

    let gist = ctx.gists.ensure_content_loaded(gist)?;
    let content = gist
        .files
        .get(&args.filename)
        .and_then(|file| file.content.as_deref())
        .ok_or_else(|| Error::NotFound(format!("File \"{}\" not found in gist", args.filename)))?;

    let (updated, count) =
        replace_in_content(content, &args.old_string, &args.new_string, args.replace_all)?;

    patch_gist_file(
        ctx,
        &args.id,
        &args.filename,
        json!({ "content": gist_content(&updated) }),
    )?;
    tracing::info!(gist_id = %args.id, filename = %args.filename, count, "Edited gist file");

    Ok(text_result(format!(
        "Successfully replaced {count} occurrence(s) in {}",
        args.filename
    )))
}

/// Executes the `delete_gist_file` tool.
pub fn execute_delete_gist_file(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: FileArgs = parse_args(arguments)?;
    let gist = assert_gist_file(ctx, &args.id, Some(&args.filename), None)?;

    if gist.files.len() <= 1 {
        return Err(Error::InvalidInput(
            "Cannot delete the last file in a gist; delete the gist instead".to_string(),
        ));
    }

    patch_gist_file(ctx, &args.id, &args.filename, Value::Null)?;

    Ok(text_result("File deleted successfully"))
}

/// Executes the `rename_gist_file` tool.
pub fn execute_rename_gist_file(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: RenameFileArgs = parse_args(arguments)?;
    assert_gist_file(
        ctx,
        &args.id,
        Some(&args.old_filename),
        Some(&args.new_filename),
    )?;

    patch_gist_file(
        ctx,
        &args.id,
        &args.old_filename,
        json!({ "filename": args.new_filename }),
    )?;

    Ok(text_result("File renamed successfully"))
}

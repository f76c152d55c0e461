//! Daily note tool execution handlers.
//!
//! Daily notes are the `MM-DD-YYYY.md` files of the daily-notes gist, keyed
//! by the local date.

use super::super::ToolResult;
use super::{create_gist, json_result, patch_gist_file, text_result};
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{DailyNoteArgs, NoArgs, UpdateTodaysNoteArgs, parse_args};
use crate::models::{DAILY_NOTES_DESCRIPTION, Gist, gist_content};
use crate::{Error, Result};
use chrono::{Local, NaiveDate};
use serde_json::{Value, json};

const NOTE_EXTENSION: &str = ".md";

/// Returns the note name (`MM-DD-YYYY`) for a date.
fn note_name(date: NaiveDate) -> String {
    date.format("%m-%d-%Y").to_string()
}

/// Returns the filename of today's note.
fn todays_filename() -> String {
    format!("{}{NOTE_EXTENSION}", note_name(Local::now().date_naive()))
}

/// Initial content of a new daily note.
fn initial_note_content(filename: &str) -> String {
    format!("# {}\n", filename.trim_end_matches(NOTE_EXTENSION))
}

fn file_content(gist: &Gist, filename: &str) -> String {
    gist.files
        .get(filename)
        .and_then(|file| file.content.clone())
        .unwrap_or_default()
}

fn missing_note() -> Error {
    Error::NotFound("Requested daily note doesn't exist".to_string())
}

/// Executes the `get_todays_note` tool.
///
/// Creates the daily-notes gist or today's file when missing.
pub fn execute_get_todays_note(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let NoArgs {} = parse_args(arguments)?;
    let filename = todays_filename();

    let gist = match ctx.gists.get_daily_notes()? {
        None => {
            let mut files = serde_json::Map::new();
            files.insert(
                filename.clone(),
                json!({ "content": initial_note_content(&filename) }),
            );
            let gist = create_gist(ctx, DAILY_NOTES_DESCRIPTION, false, Value::Object(files))?;
            tracing::info!(gist_id = %gist.id, "Created daily notes gist");
            ctx.gists.set_daily_notes(gist.clone());
            gist
        },
        Some(gist) if !gist.files.contains_key(&filename) => {
            tracing::info!(gist_id = %gist.id, filename = %filename, "Creating today's note");
            patch_gist_file(
                ctx,
                &gist.id,
                &filename,
                json!({ "content": initial_note_content(&filename) }),
            )?
        },
        Some(gist) => gist,
    };

    Ok(text_result(file_content(&gist, &filename)))
}

/// Executes the `update_todays_note` tool.
///
/// Requires the daily-notes gist to exist (see `get_todays_note`).
pub fn execute_update_todays_note(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: UpdateTodaysNoteArgs = parse_args(arguments)?;
    let gist = ctx.gists.get_daily_notes()?.ok_or_else(|| {
        Error::NotFound(
            "Daily notes gist not found; call get_todays_note to create it".to_string(),
        )
    })?;

    patch_gist_file(
        ctx,
        &gist.id,
        &todays_filename(),
        json!({ "content": gist_content(&args.content) }),
    )?;

    Ok(text_result("Successfully updated today's note"))
}

/// Executes the `list_daily_notes` tool.
pub fn execute_list_daily_notes(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let NoArgs {} = parse_args(arguments)?;

    let notes: Vec<Value> = ctx
        .gists
        .get_daily_notes()?
        .map(|gist| {
            gist.files
                .keys()
                .map(|filename| json!({ "date": filename.trim_end_matches(NOTE_EXTENSION) }))
                .collect()
        })
        .unwrap_or_default();

    json_result(&json!({
        "count": notes.len(),
        "notes": notes,
    }))
}

/// Executes the `get_daily_note` tool.
pub fn execute_get_daily_note(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: DailyNoteArgs = parse_args(arguments)?;
    let filename = format!("{}{NOTE_EXTENSION}", args.date);

    let gist = ctx.gists.get_daily_notes()?.ok_or_else(missing_note)?;
    if !gist.files.contains_key(&filename) {
        return Err(missing_note());
    }

    Ok(text_result(file_content(&gist, &filename)))
}

/// Executes the `delete_daily_note` tool.
pub fn execute_delete_daily_note(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: DailyNoteArgs = parse_args(arguments)?;
    let filename = format!("{}{NOTE_EXTENSION}", args.date);

    let gist = ctx.gists.get_daily_notes()?.ok_or_else(missing_note)?;
    if !gist.files.contains_key(&filename) {
        return Err(missing_note());
    }
    if gist.files.len() <= 1 {
        return Err(Error::InvalidInput(
            "Cannot delete the only remaining daily note".to_string(),
        ));
    }

    patch_gist_file(ctx, &gist.id, &filename, Value::Null)?;

    Ok(text_result(format!(
        "Successfully deleted daily note for {}",
        args.date
    )))
}

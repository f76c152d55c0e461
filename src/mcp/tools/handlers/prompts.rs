//! Prompt tool execution handlers.

use super::super::ToolResult;
use super::{create_gist, patch_gist, patch_gist_file, text_result};
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{AddPromptArgs, DeletePromptArgs, parse_args};
use crate::models::{PROMPTS_DESCRIPTION, PromptArgument, build_prompt_file, prompt_filename};
use crate::{Error, Result};
use serde_json::{Value, json};

/// Executes the `add_prompt` tool.
///
/// Creates the prompts gist on first use. An existing prompt with the same
/// name is overwritten.
pub fn execute_add_prompt(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: AddPromptArgs = parse_args(arguments)?;
    if args.name.trim().is_empty() {
        return Err(Error::InvalidInput("Prompt name is required".to_string()));
    }
    if args.prompt.trim().is_empty() {
        return Err(Error::InvalidInput("Prompt content is required".to_string()));
    }

    let filename = prompt_filename(args.name.trim());
    let prompt_arguments: Vec<PromptArgument> = args
        .arguments
        .into_iter()
        .map(|arg| PromptArgument::required(arg.name, arg.description))
        .collect();
    let content = build_prompt_file(&args.prompt, args.description.as_deref(), &prompt_arguments)?;

    let mut files = serde_json::Map::new();
    files.insert(filename, json!({ "content": content }));

    match ctx.gists.get_prompts()? {
        Some(gist) => {
            patch_gist(ctx, &gist.id, &json!({ "files": files }))?;
        },
        None => {
            let gist = create_gist(ctx, PROMPTS_DESCRIPTION, false, Value::Object(files))?;
            tracing::info!(gist_id = %gist.id, "Created prompts gist");
            ctx.gists.set_prompts(gist);
        },
    }

    Ok(text_result(format!(
        "Successfully added prompt \"{}\" to prompts collection",
        args.name
    )))
}

/// Executes the `delete_prompt` tool.
pub fn execute_delete_prompt(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let args: DeletePromptArgs = parse_args(arguments)?;

    let gist = ctx
        .gists
        .get_prompts()?
        .ok_or_else(|| Error::NotFound("Prompts collection not found".to_string()))?;

    let filename = prompt_filename(&args.name);
    if !gist.files.contains_key(&filename) {
        return Err(Error::NotFound(format!("Prompt '{filename}' not found")));
    }

    patch_gist_file(ctx, &gist.id, &filename, Value::Null)?;

    Ok(text_result(format!(
        "Successfully deleted prompt \"{}\"",
        args.name
    )))
}

//! Refresh tool execution handler.

use super::super::ToolResult;
use super::text_result;
use crate::mcp::context::GistContext;
use crate::mcp::tool_types::{NoArgs, parse_args};
use crate::Result;
use serde_json::Value;

/// Executes the `refresh_gists` tool.
///
/// Reloads both stores, picking up changes made by other clients.
pub fn execute_refresh_gists(ctx: &GistContext, arguments: Value) -> Result<ToolResult> {
    let NoArgs {} = parse_args(arguments)?;

    ctx.gists.refresh()?;
    ctx.starred.refresh()?;

    Ok(text_result("Gists refreshed!"))
}

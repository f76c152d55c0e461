//! MCP tool implementations.
//!
//! # Module Structure
//!
//! - [`definitions`]: Tool schema definitions (JSON Schema for input validation)
//! - [`handlers`]: Tool execution logic, one submodule per tool group
//!
//! Tool names are parsed into [`ToolName`] once; the registry dispatches on
//! the variant.

mod definitions;
mod handlers;

use super::context::GistContext;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Every tool the server knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    /// `list_gists`
    ListGists,
    /// `get_gist`
    GetGist,
    /// `create_gist`
    CreateGist,
    /// `delete_gist`
    DeleteGist,
    /// `update_gist_description`
    UpdateGistDescription,
    /// `duplicate_gist`
    DuplicateGist,
    /// `add_gist_file`
    AddGistFile,
    /// `update_gist_file`
    UpdateGistFile,
    /// `edit_gist_file`
    EditGistFile,
    /// `delete_gist_file`
    DeleteGistFile,
    /// `rename_gist_file`
    RenameGistFile,
    /// `get_todays_note`
    GetTodaysNote,
    /// `update_todays_note`
    UpdateTodaysNote,
    /// `list_daily_notes`
    ListDailyNotes,
    /// `get_daily_note`
    GetDailyNote,
    /// `delete_daily_note`
    DeleteDailyNote,
    /// `add_prompt`
    AddPrompt,
    /// `delete_prompt`
    DeletePrompt,
    /// `list_gist_comments`
    ListGistComments,
    /// `add_gist_comment`
    AddGistComment,
    /// `delete_gist_comment`
    DeleteGistComment,
    /// `list_archived_gists`
    ListArchivedGists,
    /// `archive_gist`
    ArchiveGist,
    /// `unarchive_gist`
    UnarchiveGist,
    /// `list_starred_gists`
    ListStarredGists,
    /// `star_gist`
    StarGist,
    /// `unstar_gist`
    UnstarGist,
    /// `refresh_gists`
    RefreshGists,
}

impl ToolName {
    /// All tools, in listing order.
    pub const ALL: [Self; 28] = [
        Self::ListGists,
        Self::GetGist,
        Self::CreateGist,
        Self::DeleteGist,
        Self::UpdateGistDescription,
        Self::DuplicateGist,
        Self::AddGistFile,
        Self::UpdateGistFile,
        Self::EditGistFile,
        Self::DeleteGistFile,
        Self::RenameGistFile,
        Self::GetTodaysNote,
        Self::UpdateTodaysNote,
        Self::ListDailyNotes,
        Self::GetDailyNote,
        Self::DeleteDailyNote,
        Self::AddPrompt,
        Self::DeletePrompt,
        Self::ListGistComments,
        Self::AddGistComment,
        Self::DeleteGistComment,
        Self::ListArchivedGists,
        Self::ArchiveGist,
        Self::UnarchiveGist,
        Self::ListStarredGists,
        Self::StarGist,
        Self::UnstarGist,
        Self::RefreshGists,
    ];

    /// Returns the wire name of the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListGists => "list_gists",
            Self::GetGist => "get_gist",
            Self::CreateGist => "create_gist",
            Self::DeleteGist => "delete_gist",
            Self::UpdateGistDescription => "update_gist_description",
            Self::DuplicateGist => "duplicate_gist",
            Self::AddGistFile => "add_gist_file",
            Self::UpdateGistFile => "update_gist_file",
            Self::EditGistFile => "edit_gist_file",
            Self::DeleteGistFile => "delete_gist_file",
            Self::RenameGistFile => "rename_gist_file",
            Self::GetTodaysNote => "get_todays_note",
            Self::UpdateTodaysNote => "update_todays_note",
            Self::ListDailyNotes => "list_daily_notes",
            Self::GetDailyNote => "get_daily_note",
            Self::DeleteDailyNote => "delete_daily_note",
            Self::AddPrompt => "add_prompt",
            Self::DeletePrompt => "delete_prompt",
            Self::ListGistComments => "list_gist_comments",
            Self::AddGistComment => "add_gist_comment",
            Self::DeleteGistComment => "delete_gist_comment",
            Self::ListArchivedGists => "list_archived_gists",
            Self::ArchiveGist => "archive_gist",
            Self::UnarchiveGist => "unarchive_gist",
            Self::ListStarredGists => "list_starred_gists",
            Self::StarGist => "star_gist",
            Self::UnstarGist => "unstar_gist",
            Self::RefreshGists => "refresh_gists",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    /// Returns true for tools only offered when prompts are enabled.
    #[must_use]
    pub const fn requires_prompts(self) -> bool {
        matches!(self, Self::AddPrompt | Self::DeletePrompt)
    }

    fn definition(self) -> fn() -> ToolDefinition {
        match self {
            Self::ListGists => definitions::list_gists_tool,
            Self::GetGist => definitions::get_gist_tool,
            Self::CreateGist => definitions::create_gist_tool,
            Self::DeleteGist => definitions::delete_gist_tool,
            Self::UpdateGistDescription => definitions::update_gist_description_tool,
            Self::DuplicateGist => definitions::duplicate_gist_tool,
            Self::AddGistFile => definitions::add_gist_file_tool,
            Self::UpdateGistFile => definitions::update_gist_file_tool,
            Self::EditGistFile => definitions::edit_gist_file_tool,
            Self::DeleteGistFile => definitions::delete_gist_file_tool,
            Self::RenameGistFile => definitions::rename_gist_file_tool,
            Self::GetTodaysNote => definitions::get_todays_note_tool,
            Self::UpdateTodaysNote => definitions::update_todays_note_tool,
            Self::ListDailyNotes => definitions::list_daily_notes_tool,
            Self::GetDailyNote => definitions::get_daily_note_tool,
            Self::DeleteDailyNote => definitions::delete_daily_note_tool,
            Self::AddPrompt => definitions::add_prompt_tool,
            Self::DeletePrompt => definitions::delete_prompt_tool,
            Self::ListGistComments => definitions::list_gist_comments_tool,
            Self::AddGistComment => definitions::add_gist_comment_tool,
            Self::DeleteGistComment => definitions::delete_gist_comment_tool,
            Self::ListArchivedGists => definitions::list_archived_gists_tool,
            Self::ArchiveGist => definitions::archive_gist_tool,
            Self::UnarchiveGist => definitions::unarchive_gist_tool,
            Self::ListStarredGists => definitions::list_starred_gists_tool,
            Self::StarGist => definitions::star_gist_tool,
            Self::UnstarGist => definitions::unstar_gist_tool,
            Self::RefreshGists => definitions::refresh_gists_tool,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry of MCP tools.
pub struct ToolRegistry {
    /// Available tools.
    tools: HashMap<ToolName, ToolDefinition>,
    /// Shared handler state.
    context: Arc<GistContext>,
}

impl ToolRegistry {
    /// Creates a registry with every tool enabled by the context's features.
    #[must_use]
    pub fn new(context: Arc<GistContext>) -> Self {
        let include_prompts = context.features.include_prompts;
        let tools = ToolName::ALL
            .into_iter()
            .filter(|tool| include_prompts || !tool.requires_prompts())
            .map(|tool| (tool, tool.definition()()))
            .collect();

        Self { tools, context }
    }

    /// Returns all tool definitions in listing order.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        ToolName::ALL
            .iter()
            .filter_map(|tool| self.tools.get(tool))
            .collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        ToolName::parse(name).and_then(|tool| self.tools.get(&tool))
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool is unknown or disabled, the arguments
    /// are invalid, or the tool execution fails.
    pub fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let tool = ToolName::parse(name)
            .filter(|tool| self.tools.contains_key(tool))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown tool: {name}")))?;

        let ctx = self.context.as_ref();
        match tool {
            ToolName::ListGists => handlers::execute_list_gists(ctx, arguments),
            ToolName::GetGist => handlers::execute_get_gist(ctx, arguments),
            ToolName::CreateGist => handlers::execute_create_gist(ctx, arguments),
            ToolName::DeleteGist => handlers::execute_delete_gist(ctx, arguments),
            ToolName::UpdateGistDescription => {
                handlers::execute_update_gist_description(ctx, arguments)
            },
            ToolName::DuplicateGist => handlers::execute_duplicate_gist(ctx, arguments),
            ToolName::AddGistFile => handlers::execute_add_gist_file(ctx, arguments),
            ToolName::UpdateGistFile => handlers::execute_update_gist_file(ctx, arguments),
            ToolName::EditGistFile => handlers::execute_edit_gist_file(ctx, arguments),
            ToolName::DeleteGistFile => handlers::execute_delete_gist_file(ctx, arguments),
            ToolName::RenameGistFile => handlers::execute_rename_gist_file(ctx, arguments),
            ToolName::GetTodaysNote => handlers::execute_get_todays_note(ctx, arguments),
            ToolName::UpdateTodaysNote => handlers::execute_update_todays_note(ctx, arguments),
            ToolName::ListDailyNotes => handlers::execute_list_daily_notes(ctx, arguments),
            ToolName::GetDailyNote => handlers::execute_get_daily_note(ctx, arguments),
            ToolName::DeleteDailyNote => handlers::execute_delete_daily_note(ctx, arguments),
            ToolName::AddPrompt => handlers::execute_add_prompt(ctx, arguments),
            ToolName::DeletePrompt => handlers::execute_delete_prompt(ctx, arguments),
            ToolName::ListGistComments => handlers::execute_list_gist_comments(ctx, arguments),
            ToolName::AddGistComment => handlers::execute_add_gist_comment(ctx, arguments),
            ToolName::DeleteGistComment => handlers::execute_delete_gist_comment(ctx, arguments),
            ToolName::ListArchivedGists => handlers::execute_list_archived_gists(ctx, arguments),
            ToolName::ArchiveGist => handlers::execute_archive_gist(ctx, arguments),
            ToolName::UnarchiveGist => handlers::execute_unarchive_gist(ctx, arguments),
            ToolName::ListStarredGists => handlers::execute_list_starred_gists(ctx, arguments),
            ToolName::StarGist => handlers::execute_star_gist(ctx, arguments),
            ToolName::UnstarGist => handlers::execute_unstar_gist(ctx, arguments),
            ToolName::RefreshGists => handlers::execute_refresh_gists(ctx, arguments),
        }
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default)]
    pub is_error: bool,
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

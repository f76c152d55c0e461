//! Tool definitions for MCP tools.
//!
//! Contains the JSON Schema definitions for all gistpad tools.

use super::ToolDefinition;
use serde_json::{Value, json};

const DATE_FORMAT_HINT: &str = "in the following format: MM-DD-YYYY (e.g. 03-10-2025)";

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn no_args_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn gist_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "description": description
            }
        },
        "required": ["id"]
    })
}

fn file_content_schema(filename_description: &str, content_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "description": "The ID of the gist"
            },
            "filename": {
                "type": "string",
                "description": filename_description
            },
            "content": {
                "type": "string",
                "description": content_description
            }
        },
        "required": ["id", "filename", "content"]
    })
}

fn daily_note_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "date": {
                "type": "string",
                "description": format!("{description}, {DATE_FORMAT_HINT}")
            }
        },
        "required": ["date"]
    })
}

// ============================================================================
// Gists
// ============================================================================

/// Defines the `list_gists` tool.
pub fn list_gists_tool() -> ToolDefinition {
    tool(
        "list_gists",
        "List all of your GitHub Gists (excluding daily notes, prompts and archived gists)",
        no_args_schema(),
    )
}

/// Defines the `get_gist` tool.
pub fn get_gist_tool() -> ToolDefinition {
    tool(
        "get_gist",
        "Get a specific GitHub Gist by ID, including the content of its files",
        gist_id_schema("The ID of the Gist to retrieve"),
    )
}

/// Defines the `create_gist` tool.
pub fn create_gist_tool() -> ToolDefinition {
    tool(
        "create_gist",
        "Create a new GitHub Gist with a single file",
        json!({
            "type": "object",
            "properties": {
                "description": {
                    "type": "string",
                    "description": "Description of the Gist"
                },
                "content": {
                    "type": "string",
                    "description": "Content of the file"
                },
                "filename": {
                    "type": "string",
                    "description": "Name of the file (default: README.md)"
                },
                "public": {
                    "type": "boolean",
                    "description": "Whether the Gist should be public",
                    "default": false
                }
            },
            "required": ["description", "content"]
        }),
    )
}

/// Defines the `delete_gist` tool.
pub fn delete_gist_tool() -> ToolDefinition {
    tool(
        "delete_gist",
        "Delete a GitHub Gist by ID",
        gist_id_schema("The ID of the Gist to delete"),
    )
}

/// Defines the `update_gist_description` tool.
pub fn update_gist_description_tool() -> ToolDefinition {
    tool(
        "update_gist_description",
        "Update a GitHub Gist's description",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The ID of the Gist to update"
                },
                "description": {
                    "type": "string",
                    "description": "The new description for the Gist"
                }
            },
            "required": ["id", "description"]
        }),
    )
}

/// Defines the `duplicate_gist` tool.
pub fn duplicate_gist_tool() -> ToolDefinition {
    tool(
        "duplicate_gist",
        "Create a copy of an existing gist",
        gist_id_schema("The ID of the Gist to duplicate"),
    )
}

// ============================================================================
// Files
// ============================================================================

/// Defines the `add_gist_file` tool.
pub fn add_gist_file_tool() -> ToolDefinition {
    tool(
        "add_gist_file",
        "Add a new file to a gist",
        file_content_schema("The name of the new file", "The content for the new file"),
    )
}

/// Defines the `update_gist_file` tool.
pub fn update_gist_file_tool() -> ToolDefinition {
    tool(
        "update_gist_file",
        "Replace the entire content of a file in a gist",
        file_content_schema("The name of the file to update", "The new content for the file"),
    )
}

/// Defines the `edit_gist_file` tool.
pub fn edit_gist_file_tool() -> ToolDefinition {
    tool(
        "edit_gist_file",
        "Edit a file in a gist by replacing an exact string. Fails if the string is missing, or appears more than once unless replace_all is set.",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The ID of the gist"
                },
                "filename": {
                    "type": "string",
                    "description": "The name of the file to edit"
                },
                "old_string": {
                    "type": "string",
                    "description": "The exact text to replace"
                },
                "new_string": {
                    "type": "string",
                    "description": "The replacement text (must differ from old_string)"
                },
                "replace_all": {
                    "type": "boolean",
                    "description": "Replace every occurrence of old_string",
                    "default": false
                }
            },
            "required": ["id", "filename", "old_string", "new_string"]
        }),
    )
}

/// Defines the `delete_gist_file` tool.
pub fn delete_gist_file_tool() -> ToolDefinition {
    tool(
        "delete_gist_file",
        "Delete a file from a gist",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The ID of the gist"
                },
                "filename": {
                    "type": "string",
                    "description": "The name of the file to delete"
                }
            },
            "required": ["id", "filename"]
        }),
    )
}

/// Defines the `rename_gist_file` tool.
pub fn rename_gist_file_tool() -> ToolDefinition {
    tool(
        "rename_gist_file",
        "Rename a file in a gist",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The ID of the gist"
                },
                "old_filename": {
                    "type": "string",
                    "description": "The current name of the file"
                },
                "new_filename": {
                    "type": "string",
                    "description": "The new name for the file"
                }
            },
            "required": ["id", "old_filename", "new_filename"]
        }),
    )
}

// ============================================================================
// Daily notes
// ============================================================================

/// Defines the `get_todays_note` tool.
pub fn get_todays_note_tool() -> ToolDefinition {
    tool(
        "get_todays_note",
        "Get or create the daily note for today's date (for tracking todos, tasks, scratch notes, etc.)",
        no_args_schema(),
    )
}

/// Defines the `update_todays_note` tool.
pub fn update_todays_note_tool() -> ToolDefinition {
    tool(
        "update_todays_note",
        "Update the existing content of today's daily note",
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The updated content for today's daily note"
                }
            },
            "required": ["content"]
        }),
    )
}

/// Defines the `list_daily_notes` tool.
pub fn list_daily_notes_tool() -> ToolDefinition {
    tool(
        "list_daily_notes",
        "List all of your existing/historical daily notes",
        no_args_schema(),
    )
}

/// Defines the `get_daily_note` tool.
pub fn get_daily_note_tool() -> ToolDefinition {
    tool(
        "get_daily_note",
        "Get the contents for a specific/existing daily note",
        daily_note_schema("Date of the daily note to retrieve"),
    )
}

/// Defines the `delete_daily_note` tool.
pub fn delete_daily_note_tool() -> ToolDefinition {
    tool(
        "delete_daily_note",
        "Delete a specific daily note by date",
        daily_note_schema("Date of the daily note to delete"),
    )
}

// ============================================================================
// Prompts
// ============================================================================

/// Defines the `add_prompt` tool.
pub fn add_prompt_tool() -> ToolDefinition {
    tool(
        "add_prompt",
        "Add a new prompt to your prompts collection",
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the prompt (will be used as the filename)"
                },
                "prompt": {
                    "type": "string",
                    "description": "The prompt content. Use {{name}} placeholders for arguments."
                },
                "description": {
                    "type": "string",
                    "description": "Optional description of the prompt"
                },
                "arguments": {
                    "type": "array",
                    "description": "Optional list of argument definitions",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "Name of the argument"
                            },
                            "description": {
                                "type": "string",
                                "description": "Description of the argument"
                            }
                        },
                        "required": ["name", "description"]
                    }
                }
            },
            "required": ["name", "prompt"]
        }),
    )
}

/// Defines the `delete_prompt` tool.
pub fn delete_prompt_tool() -> ToolDefinition {
    tool(
        "delete_prompt",
        "Delete a prompt from your prompts collection",
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Name of the prompt to delete (the .md extension is optional)"
                }
            },
            "required": ["name"]
        }),
    )
}

// ============================================================================
// Comments
// ============================================================================

/// Defines the `list_gist_comments` tool.
pub fn list_gist_comments_tool() -> ToolDefinition {
    tool(
        "list_gist_comments",
        "List all comments on a gist",
        gist_id_schema("The ID of the gist"),
    )
}

/// Defines the `add_gist_comment` tool.
pub fn add_gist_comment_tool() -> ToolDefinition {
    tool(
        "add_gist_comment",
        "Add a comment to a gist",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "The ID of the gist"
                },
                "body": {
                    "type": "string",
                    "description": "The comment text"
                }
            },
            "required": ["id", "body"]
        }),
    )
}

/// Defines the `delete_gist_comment` tool.
pub fn delete_gist_comment_tool() -> ToolDefinition {
    tool(
        "delete_gist_comment",
        "Delete a comment from a gist",
        json!({
            "type": "object",
            "properties": {
                "gist_id": {
                    "type": "string",
                    "description": "The ID of the gist"
                },
                "comment_id": {
                    "type": "string",
                    "description": "The ID of the comment to delete"
                }
            },
            "required": ["gist_id", "comment_id"]
        }),
    )
}

// ============================================================================
// Archive
// ============================================================================

/// Defines the `list_archived_gists` tool.
pub fn list_archived_gists_tool() -> ToolDefinition {
    tool(
        "list_archived_gists",
        "List all of your archived gists",
        no_args_schema(),
    )
}

/// Defines the `archive_gist` tool.
pub fn archive_gist_tool() -> ToolDefinition {
    tool(
        "archive_gist",
        "Archive a gist by ID",
        gist_id_schema("The ID of the gist to archive"),
    )
}

/// Defines the `unarchive_gist` tool.
pub fn unarchive_gist_tool() -> ToolDefinition {
    tool(
        "unarchive_gist",
        "Unarchive a gist",
        gist_id_schema("The ID of the gist to unarchive"),
    )
}

// ============================================================================
// Stars
// ============================================================================

/// Defines the `list_starred_gists` tool.
pub fn list_starred_gists_tool() -> ToolDefinition {
    tool(
        "list_starred_gists",
        "List all your starred gists",
        no_args_schema(),
    )
}

/// Defines the `star_gist` tool.
pub fn star_gist_tool() -> ToolDefinition {
    tool(
        "star_gist",
        "Star a gist",
        gist_id_schema("The ID of the gist to star"),
    )
}

/// Defines the `unstar_gist` tool.
pub fn unstar_gist_tool() -> ToolDefinition {
    tool(
        "unstar_gist",
        "Unstar a gist",
        gist_id_schema("The ID of the gist to unstar"),
    )
}

// ============================================================================
// Refresh
// ============================================================================

/// Defines the `refresh_gists` tool.
pub fn refresh_gists_tool() -> ToolDefinition {
    tool(
        "refresh_gists",
        "Refresh the server's cache of gists, to ensure it picks up any changes made by external clients.",
        no_args_schema(),
    )
}

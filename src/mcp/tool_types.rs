//! Argument types for MCP tools.
//!
//! All argument types use `#[serde(deny_unknown_fields)]` so a misspelled
//! argument is reported instead of silently ignored.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses tool arguments into their typed form.
///
/// A missing argument object is treated as `{}`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the arguments do not match `T`.
pub fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Arguments for tools that take no input.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoArgs {}

/// Arguments for tools addressing one gist.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GistIdArgs {
    /// Gist ID.
    pub id: String,
}

/// Arguments for `create_gist`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGistArgs {
    /// Gist description.
    pub description: String,
    /// Content of the single file.
    pub content: String,
    /// Filename (default `README.md`).
    pub filename: Option<String>,
    /// Visibility (default private).
    #[serde(default)]
    pub public: bool,
}

/// Arguments for `update_gist_description`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDescriptionArgs {
    /// Gist ID.
    pub id: String,
    /// New description.
    pub description: String,
}

/// Arguments for `add_gist_file` and `update_gist_file`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileContentArgs {
    /// Gist ID.
    pub id: String,
    /// File name.
    pub filename: String,
    /// File content.
    pub content: String,
}

/// Arguments for `edit_gist_file`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditFileArgs {
    /// Gist ID.
    pub id: String,
    /// File name.
    pub filename: String,
    /// Exact text to find.
    pub old_string: String,
    /// Replacement text.
    pub new_string: String,
    /// Replace every occurrence instead of requiring a unique match.
    #[serde(default)]
    pub replace_all: bool,
}

/// Arguments for `delete_gist_file`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileArgs {
    /// Gist ID.
    pub id: String,
    /// File name.
    pub filename: String,
}

/// Arguments for `rename_gist_file`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenameFileArgs {
    /// Gist ID.
    pub id: String,
    /// Current file name.
    pub old_filename: String,
    /// New file name.
    pub new_filename: String,
}

/// Arguments for `update_todays_note`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodaysNoteArgs {
    /// New content of today's note.
    pub content: String,
}

/// Arguments for `get_daily_note` and `delete_daily_note`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyNoteArgs {
    /// Date in `MM-DD-YYYY` form.
    pub date: String,
}

/// Arguments for `add_prompt`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddPromptArgs {
    /// Prompt name (used as the filename).
    pub name: String,
    /// Prompt body.
    pub prompt: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional argument definitions.
    #[serde(default)]
    pub arguments: Vec<PromptArgumentInput>,
}

/// An argument definition passed to `add_prompt`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptArgumentInput {
    /// Argument name.
    pub name: String,
    /// Argument description.
    pub description: String,
}

/// Arguments for `delete_prompt`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeletePromptArgs {
    /// Prompt name, with or without `.md`.
    pub name: String,
}

/// Arguments for `add_gist_comment`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddCommentArgs {
    /// Gist ID.
    pub id: String,
    /// Comment body.
    pub body: String,
}

/// Arguments for `delete_gist_comment`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteCommentArgs {
    /// Gist ID.
    pub gist_id: String,
    /// Comment ID (string or number).
    #[serde(deserialize_with = "string_or_number")]
    pub comment_id: String,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_rejected() {
        let err = parse_args::<GistIdArgs>(json!({ "id": "a", "extra": 1 })).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_missing_field_rejected() {
        assert!(parse_args::<FileArgs>(json!({ "id": "a" })).is_err());
    }

    #[test]
    fn test_null_arguments_as_empty() {
        assert!(parse_args::<NoArgs>(Value::Null).is_ok());
    }

    #[test]
    fn test_defaults() {
        let args: CreateGistArgs =
            parse_args(json!({ "description": "d", "content": "c" })).unwrap();
        assert!(!args.public);
        assert!(args.filename.is_none());

        let args: EditFileArgs = parse_args(json!({
            "id": "a", "filename": "f", "old_string": "x", "new_string": "y"
        }))
        .unwrap();
        assert!(!args.replace_all);
    }

    #[test]
    fn test_comment_id_string_or_number() {
        let args: DeleteCommentArgs =
            parse_args(json!({ "gist_id": "a", "comment_id": 42 })).unwrap();
        assert_eq!(args.comment_id, "42");

        let args: DeleteCommentArgs =
            parse_args(json!({ "gist_id": "a", "comment_id": "43" })).unwrap();
        assert_eq!(args.comment_id, "43");

        assert!(parse_args::<DeleteCommentArgs>(json!({ "gist_id": "a", "comment_id": true })).is_err());
    }
}

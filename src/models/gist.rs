//! Gist documents and the predicates that classify them.
//!
//! The description field doubles as a tag channel: a trailing
//! [`ARCHIVED_SUFFIX`] marks an archived gist, and two literal descriptions
//! mark the daily-notes and prompts collections. All matching on those
//! sentinels goes through the predicate functions in this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Suffix appended to the description of archived gists.
pub const ARCHIVED_SUFFIX: &str = " [Archived]";

/// Suffix appended to starred gists when they are listed as resources.
pub const STARRED_SUFFIX: &str = " [Starred]";

/// Description of the gist that holds daily notes.
pub const DAILY_NOTES_DESCRIPTION: &str = "📆 Daily notes";

/// Description of the gist that holds reusable prompts.
pub const PROMPTS_DESCRIPTION: &str = "💬 Prompts";

/// URI prefix for gist resources.
pub const GIST_URI_PREFIX: &str = "gist:///";

/// Placeholder content for empty files.
///
/// GitHub rejects files with empty content, so an "invisible plus" is
/// written instead.
pub const EMPTY_FILE_CONTENT: &str = "\u{2064}";

const GISTPAD_BASE_URL: &str = "https://gistpad.dev/#";

/// Owner of a gist or author of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GistOwner {
    /// GitHub login.
    pub login: String,
}

/// A single file within a gist.
///
/// `content` is absent when the gist was fetched through a listing
/// endpoint, which only returns file metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GistFile {
    /// File name, duplicated from the map key by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// MIME type reported by GitHub.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Detected language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// URL of the raw file content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// File content, when loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl GistFile {
    /// Creates a file record with content.
    #[must_use]
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            size: content.len() as u64,
            content: Some(content),
            ..Self::default()
        }
    }
}

/// A gist document as returned by the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gist {
    /// Stable gist identifier.
    pub id: String,
    /// Free-text description. `null` from the API is read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Files keyed by filename.
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
    /// Visibility.
    #[serde(default)]
    pub public: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
    /// Owner of the gist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<GistOwner>,
    /// Number of comments.
    #[serde(default)]
    pub comments: u64,
}

impl Gist {
    /// Returns the file shown when the gist is read as a single document.
    ///
    /// That is `README.md` when present, otherwise the first file.
    #[must_use]
    pub fn main_file(&self) -> Option<(&str, &GistFile)> {
        self.files
            .get_key_value("README.md")
            .or_else(|| self.files.iter().next())
            .map(|(name, file)| (name.as_str(), file))
    }

    /// Returns the filenames in the gist.
    #[must_use]
    pub fn filenames(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Returns the resource URI for this gist.
    #[must_use]
    pub fn uri(&self) -> String {
        format!("{GIST_URI_PREFIX}{}", self.id)
    }
}

/// A comment on a gist. Comments are never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GistComment {
    /// Comment identifier.
    pub id: u64,
    /// Comment body (markdown).
    pub body: String,
    /// Author of the comment.
    #[serde(default)]
    pub user: Option<GistOwner>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true if the gist's description carries the archived suffix.
#[must_use]
pub fn is_archived_gist(gist: &Gist) -> bool {
    gist.description.ends_with(ARCHIVED_SUFFIX)
}

/// Returns true if the gist is the daily-notes collection.
#[must_use]
pub fn is_daily_note_gist(gist: &Gist) -> bool {
    gist.description == DAILY_NOTES_DESCRIPTION
}

/// Returns true if the gist is the prompts collection.
#[must_use]
pub fn is_prompt_gist(gist: &Gist) -> bool {
    gist.description == PROMPTS_DESCRIPTION
}

/// Returns true if every file in the gist carries its content.
///
/// Content loading is all-or-nothing: a gist with any file missing its
/// content must be re-fetched as a whole.
#[must_use]
pub fn is_content_loaded(gist: &Gist) -> bool {
    gist.files.values().all(|file| file.content.is_some())
}

/// Returns true if every file is markdown or a tldraw drawing.
#[must_use]
pub fn is_markdown_gist(gist: &Gist) -> bool {
    gist.files.iter().all(|(name, file)| {
        let lower = name.to_ascii_lowercase();
        lower.ends_with(".md")
            || lower.ends_with(".tldraw")
            || file.language.as_deref() == Some("Markdown")
    })
}

/// Returns the description of an archived copy of `description`.
#[must_use]
pub fn archived_description(description: &str) -> String {
    format!("{description}{ARCHIVED_SUFFIX}")
}

/// Removes exactly one trailing archived suffix from `description`.
#[must_use]
pub fn unarchived_description(description: &str) -> String {
    description
        .strip_suffix(ARCHIVED_SUFFIX)
        .unwrap_or(description)
        .to_string()
}

/// Substitutes the empty-file placeholder for empty content.
#[must_use]
pub fn gist_content(content: &str) -> &str {
    if content.is_empty() {
        EMPTY_FILE_CONTENT
    } else {
        content
    }
}

/// Returns the gistpad.dev URL for a gist.
#[must_use]
pub fn gistpad_url(id: &str) -> String {
    format!("{GISTPAD_BASE_URL}/{id}")
}

/// Returns the gistpad.dev share URL for a gist.
#[must_use]
pub fn gistpad_share_url(id: &str) -> String {
    format!("{GISTPAD_BASE_URL}/share/{id}")
}

/// Flattened view of a gist handed to MCP clients.
#[derive(Debug, Clone, Serialize)]
pub struct GistSummary {
    /// Gist identifier.
    pub id: String,
    /// Description.
    pub description: String,
    /// Owner login.
    pub owner: Option<String>,
    /// Visibility.
    pub public: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Files in filename order.
    pub files: Vec<FileSummary>,
    /// Number of comments.
    pub comments: u64,
    /// gistpad.dev URL.
    pub url: String,
    /// gistpad.dev share URL.
    pub share_url: String,
}

/// A file inside a [`GistSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    /// File name.
    pub filename: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Content, when loaded.
    pub content: Option<String>,
}

impl From<&Gist> for GistSummary {
    fn from(gist: &Gist) -> Self {
        Self {
            id: gist.id.clone(),
            description: gist.description.clone(),
            owner: gist.owner.as_ref().map(|owner| owner.login.clone()),
            public: gist.public,
            created_at: gist.created_at,
            updated_at: gist.updated_at,
            files: gist
                .files
                .iter()
                .map(|(filename, file)| FileSummary {
                    filename: filename.clone(),
                    mime_type: file.mime_type.clone(),
                    size: file.size,
                    content: file.content.clone(),
                })
                .collect(),
            comments: gist.comments,
            url: gistpad_url(&gist.id),
            share_url: gistpad_share_url(&gist.id),
        }
    }
}

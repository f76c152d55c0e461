//! MCP resources backed by gists.
//!
//! # URI Scheme
//!
//! | URI | Content |
//! |-----|---------|
//! | `gist:///{id}` | Gist summary JSON, fetched live |
//! | `gist:///{id}/raw` | Content of the main file (`README.md` or the first file) |
//! | `gist:///{id}/comments` | Comment list JSON, fetched live |
//!
//! Only the first form is listed; the comments form is advertised as a
//! resource template.

use super::context::GistContext;
use crate::github::DocumentClientExt;
use crate::models::{
    GIST_URI_PREFIX, Gist, GistComment, GistSummary, STARRED_SUFFIX, is_archived_gist,
    is_daily_note_gist, is_prompt_gist,
};
use crate::{Error, FeatureFlags, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// MIME type of gist and comment resources.
const JSON_MIME_TYPE: &str = "application/json";

/// A listed gist resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Resource URI.
    pub uri: String,
    /// Display name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Annotations.
    pub annotations: ResourceAnnotations,
}

/// Resource annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAnnotations {
    /// Last modification time.
    pub last_modified: DateTime<Utc>,
}

/// Content returned by `resources/read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    /// Resource URI as requested.
    pub uri: String,
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Text content.
    pub text: String,
    /// Annotations, when a modification time is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ResourceAnnotations>,
}

/// A parsed `gist:///` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GistUri {
    /// `gist:///{id}`
    Gist(String),
    /// `gist:///{id}/raw`
    Raw(String),
    /// `gist:///{id}/comments`
    Comments(String),
}

impl GistUri {
    /// Parses a gist resource URI.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for other schemes, a missing id or an
    /// unknown suffix.
    pub fn parse(uri: &str) -> Result<Self> {
        let path = uri
            .strip_prefix(GIST_URI_PREFIX)
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported resource URI: {uri}")))?;

        let mut segments = path.trim_end_matches('/').splitn(2, '/');
        let id = segments
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidInput(format!("Missing gist ID in URI: {uri}")))?
            .to_string();

        match segments.next() {
            None => Ok(Self::Gist(id)),
            Some("raw") => Ok(Self::Raw(id)),
            Some("comments") => Ok(Self::Comments(id)),
            Some(other) => Err(Error::InvalidInput(format!(
                "Unsupported gist resource path '{other}' in URI: {uri}"
            ))),
        }
    }

    /// Returns the gist id.
    #[must_use]
    pub fn gist_id(&self) -> &str {
        match self {
            Self::Gist(id) | Self::Raw(id) | Self::Comments(id) => id,
        }
    }

    /// Returns a metric label for the URI form.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Gist(_) => "gist",
            Self::Raw(_) => "raw",
            Self::Comments(_) => "comments",
        }
    }
}

/// Returns the display name of a gist resource.
///
/// The trimmed description, else the first filename without `.md`,
/// `Untitled` when that file is `README.md`, and `Empty` with no files.
#[must_use]
pub fn display_name(gist: &Gist) -> String {
    let description = gist.description.trim();
    if !description.is_empty() {
        return description.to_string();
    }

    match gist.files.keys().next() {
        None => "Empty".to_string(),
        Some(filename) if filename == "README.md" => "Untitled".to_string(),
        Some(filename) => strip_markdown_extension(filename).to_string(),
    }
}

fn strip_markdown_extension(filename: &str) -> &str {
    let len = filename.len();
    if len >= 3 && filename.is_char_boundary(len - 3) && filename[len - 3..].eq_ignore_ascii_case(".md")
    {
        &filename[..len - 3]
    } else {
        filename
    }
}

/// Builds the resource list from the owned and starred snapshots.
///
/// Starred gists are listed with [`STARRED_SUFFIX`] appended to their
/// description. The prompts gist is always hidden; archived gists and the
/// daily-notes gist are hidden unless their feature is enabled. Newest
/// first.
#[must_use]
pub fn build_resource_list(
    owned: &[Gist],
    starred: &[Gist],
    features: &FeatureFlags,
) -> Vec<ResourceDefinition> {
    let starred = starred.iter().map(|gist| Gist {
        description: format!("{}{STARRED_SUFFIX}", gist.description),
        ..gist.clone()
    });

    let mut gists: Vec<Gist> = owned
        .iter()
        .cloned()
        .chain(starred)
        .filter(|gist| {
            !is_prompt_gist(gist)
                && (features.include_archived || !is_archived_gist(gist))
                && (features.include_daily || !is_daily_note_gist(gist))
        })
        .collect();
    gists.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    gists
        .iter()
        .map(|gist| ResourceDefinition {
            uri: gist.uri(),
            name: display_name(gist),
            mime_type: JSON_MIME_TYPE.to_string(),
            annotations: ResourceAnnotations {
                last_modified: gist.updated_at,
            },
        })
        .collect()
}

/// Handler for gist resources.
pub struct ResourceHandler {
    context: Arc<GistContext>,
}

impl ResourceHandler {
    /// Creates a resource handler.
    #[must_use]
    pub const fn new(context: Arc<GistContext>) -> Self {
        Self { context }
    }

    /// Lists gist resources.
    ///
    /// # Errors
    ///
    /// Returns an error if a store cannot be loaded.
    pub fn list_resources(&self) -> Result<Vec<ResourceDefinition>> {
        let owned = self.context.gists.get_all(false)?;
        let starred = if self.context.features.include_starred {
            self.context.starred.get_all(false)?
        } else {
            Vec::new()
        };

        Ok(build_resource_list(&owned, &starred, &self.context.features))
    }

    /// Lists resource templates.
    #[must_use]
    pub fn list_templates(&self) -> Vec<Value> {
        vec![serde_json::json!({
            "uriTemplate": format!("{GIST_URI_PREFIX}{{gistId}}/comments"),
            "name": "Comments for a gist",
            "description": "List of comments on a specific gist",
            "mimeType": JSON_MIME_TYPE,
        })]
    }

    /// Reads a resource.
    ///
    /// Gist reads go to the remote service and the result is fed back into
    /// the owned store.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is invalid or the remote read fails.
    pub fn read_resource(&self, uri: &str) -> Result<ResourceContent> {
        match GistUri::parse(uri)? {
            GistUri::Comments(id) => self.read_comments(uri, &id),
            GistUri::Gist(id) => {
                let gist = self.fetch_gist(&id)?;
                Ok(ResourceContent {
                    uri: uri.to_string(),
                    mime_type: Some(JSON_MIME_TYPE.to_string()),
                    text: to_pretty_json(&GistSummary::from(&gist))?,
                    annotations: None,
                })
            },
            GistUri::Raw(id) => {
                let gist = self.fetch_gist(&id)?;
                let (filename, file) = gist
                    .main_file()
                    .ok_or_else(|| Error::NotFound(format!("Gist \"{id}\" has no files")))?;
                tracing::debug!(gist_id = %id, filename, "Reading raw gist file");
                Ok(ResourceContent {
                    uri: uri.to_string(),
                    mime_type: file.mime_type.clone(),
                    text: file.content.clone().unwrap_or_default(),
                    annotations: None,
                })
            },
        }
    }

    /// Subscribes to updates of the gist named by `uri`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is invalid.
    pub fn subscribe(&self, uri: &str) -> Result<()> {
        let parsed = GistUri::parse(uri)?;
        self.context.gists.subscribe(parsed.gist_id());
        Ok(())
    }

    /// Removes a subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is invalid.
    pub fn unsubscribe(&self, uri: &str) -> Result<()> {
        let parsed = GistUri::parse(uri)?;
        self.context.gists.unsubscribe(parsed.gist_id());
        Ok(())
    }

    fn fetch_gist(&self, id: &str) -> Result<Gist> {
        let gist: Gist = self.context.client.get_json(&format!("/{id}"), &[])?;
        self.context.gists.update(gist.clone());
        Ok(gist)
    }

    fn read_comments(&self, uri: &str, id: &str) -> Result<ResourceContent> {
        let comments: Vec<GistComment> =
            self.context.client.get_json(&format!("/{id}/comments"), &[])?;
        let last_modified = comments.iter().map(|c| c.updated_at).max();

        Ok(ResourceContent {
            uri: uri.to_string(),
            mime_type: Some(JSON_MIME_TYPE.to_string()),
            text: to_pretty_json(&comments)?,
            annotations: last_modified.map(|last_modified| ResourceAnnotations { last_modified }),
        })
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "encode_resource".to_string(),
        cause: e.to_string(),
    })
}

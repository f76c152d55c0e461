//! MCP prompts served from the prompts gist.
//!
//! Each markdown file of the prompts gist is one prompt. The list is rebuilt
//! from the store on every request; the store announces changes through
//! `notifications/prompts/list_changed`.

use crate::models::{PromptDefinition, prompt_filename, prompts_from_gist, render_prompt};
use crate::store::{GistStore, OwnedGists};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Registry of prompts derived from the prompts gist.
pub struct PromptRegistry {
    gists: Arc<GistStore<OwnedGists>>,
}

impl PromptRegistry {
    /// Creates a registry over the owned gist store.
    #[must_use]
    pub const fn new(gists: Arc<GistStore<OwnedGists>>) -> Self {
        Self { gists }
    }

    /// Returns all prompt definitions, or none when there is no prompts gist.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or the prompts gist content cannot be
    /// loaded.
    pub fn list_prompts(&self) -> Result<Vec<PromptDefinition>> {
        Ok(self
            .gists
            .get_prompts()?
            .map(|gist| prompts_from_gist(&gist))
            .unwrap_or_default())
    }

    /// Renders a prompt into a single user message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when there is no prompts gist or no such
    /// prompt, or an error if loading fails.
    pub fn get_prompt_messages(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<Vec<PromptMessage>> {
        let gist = self
            .gists
            .get_prompts()?
            .ok_or_else(|| Error::NotFound("No prompts gist found".to_string()))?;

        let content = gist
            .files
            .get(&prompt_filename(name))
            .and_then(|file| file.content.as_deref())
            .ok_or_else(|| Error::NotFound(format!("Prompt \"{name}\" not found")))?;

        Ok(vec![PromptMessage {
            role: "user".to_string(),
            content: PromptContent::Text {
                text: render_prompt(content, arguments),
            },
        }])
    }
}

/// A message in a rendered prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Role: user or assistant.
    pub role: String,
    /// Message content.
    pub content: PromptContent,
}

/// Content of a prompt message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

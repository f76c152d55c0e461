//! Prompts stored in the prompts gist.
//!
//! Every `.md` file in the prompts gist defines one prompt, named after the
//! file without its extension. Optional YAML front matter supplies the
//! description and the arguments:
//!
//! ```text
//! ---
//! description: Summarize a pull request
//! arguments:
//!   url: Link to the pull request
//! ---
//!
//! Summarize {{url}} in three bullet points.
//! ```
//!
//! Without an `arguments` map, every distinct `{{placeholder}}` in the body
//! becomes a required argument with an empty description.

use crate::{Error, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use serde_yaml_ng::{Mapping, Value as YamlValue};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::Gist;

/// Creates a compile-time verified regex wrapped in [`LazyLock`].
///
/// The `unreachable!()` branch exists only for type checking.
macro_rules! lazy_regex {
    ($pattern:expr) => {
        LazyLock::new(|| Regex::new($pattern).unwrap_or_else(|_| unreachable!()))
    };
}

/// Regex pattern for template placeholders: `{{argument_name}}`.
static PLACEHOLDER_PATTERN: LazyLock<Regex> = lazy_regex!(r"\{\{([a-zA-Z_-]+)\}\}");

/// The front matter delimiter.
const DELIMITER: &str = "---";

/// File extension of prompt files.
const PROMPT_EXTENSION: &str = ".md";

/// An argument accepted by a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptArgument {
    /// Argument name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether the argument is required. Always true for gist prompts.
    pub required: bool,
}

impl PromptArgument {
    /// Creates a required argument.
    #[must_use]
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
        }
    }
}

/// A prompt derived from one file of the prompts gist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptDefinition {
    /// Prompt name (filename without `.md`).
    pub name: String,
    /// Description from front matter, or empty.
    pub description: String,
    /// Arguments from front matter or placeholders.
    pub arguments: Vec<PromptArgument>,
}

/// Splits YAML front matter from the body of a markdown document.
///
/// Returns an empty object and the whole input when there is no front
/// matter, when the closing delimiter is missing, or when the YAML does not
/// parse to a mapping.
#[must_use]
pub fn split_front_matter(content: &str) -> (Value, &str) {
    let empty = || Value::Object(Map::new());

    let Some(rest) = content.strip_prefix(DELIMITER) else {
        return (empty(), content);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (empty(), content);
    };

    let (yaml, after) = if let Some(after) = rest.strip_prefix(DELIMITER) {
        ("", after)
    } else if let Some(pos) = rest.find("\n---") {
        (&rest[..pos], &rest[pos + 1 + DELIMITER.len()..])
    } else {
        return (empty(), content);
    };

    let body = after.trim_start_matches(['\r', '\n']);
    if yaml.trim().is_empty() {
        return (empty(), body);
    }

    match serde_yaml_ng::from_str::<Value>(yaml) {
        Ok(metadata @ Value::Object(_)) => (metadata, body),
        Ok(_) => (empty(), body),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed prompt front matter");
            (empty(), content)
        },
    }
}

/// Parses a single prompt file. Returns `None` for non-markdown files.
#[must_use]
pub fn parse_prompt_file(filename: &str, content: &str) -> Option<PromptDefinition> {
    let name = filename.strip_suffix(PROMPT_EXTENSION)?;
    let (metadata, body) = split_front_matter(content);

    let description = metadata
        .get("description")
        .map(value_to_text)
        .unwrap_or_default();

    let arguments = match metadata.get("arguments") {
        Some(Value::Object(arguments)) => arguments
            .iter()
            .map(|(name, description)| PromptArgument::required(name, value_to_text(description)))
            .collect(),
        _ => placeholder_arguments(body),
    };

    Some(PromptDefinition {
        name: name.to_string(),
        description,
        arguments,
    })
}

/// Returns every prompt defined by the prompts gist, in filename order.
#[must_use]
pub fn prompts_from_gist(gist: &Gist) -> Vec<PromptDefinition> {
    gist.files
        .iter()
        .filter_map(|(filename, file)| {
            parse_prompt_file(filename, file.content.as_deref().unwrap_or_default())
        })
        .collect()
}

/// Renders a prompt body, substituting `{{key}}` with each argument value.
///
/// Front matter is dropped and the body is trimmed. Non-string argument
/// values are substituted with their JSON representation.
#[must_use]
pub fn render_prompt(content: &str, arguments: &Map<String, Value>) -> String {
    let (_, body) = split_front_matter(content);
    let mut text = body.trim().to_string();

    for (key, value) in arguments {
        let placeholder = format!("{{{{{key}}}}}");
        text = text.replace(&placeholder, &value_to_text(value));
    }

    text
}

/// Returns the gist filename for a prompt name, adding `.md` when missing.
#[must_use]
pub fn prompt_filename(name: &str) -> String {
    if name.ends_with(PROMPT_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{PROMPT_EXTENSION}")
    }
}

/// Front matter written for a new prompt.
#[derive(Serialize)]
struct FrontMatter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    arguments: Mapping,
}

/// Builds the file content for a new prompt.
///
/// Front matter is written only when a description or arguments are given.
/// Arguments keep their order.
///
/// # Errors
///
/// Returns an error if the front matter cannot be serialized.
pub fn build_prompt_file(
    prompt: &str,
    description: Option<&str>,
    arguments: &[PromptArgument],
) -> Result<String> {
    let description = description.filter(|d| !d.is_empty());
    if description.is_none() && arguments.is_empty() {
        return Ok(prompt.to_string());
    }

    let front_matter = FrontMatter {
        description,
        arguments: arguments
            .iter()
            .map(|argument| {
                (
                    YamlValue::String(argument.name.clone()),
                    YamlValue::String(argument.description.clone()),
                )
            })
            .collect(),
    };
    let yaml = serde_yaml_ng::to_string(&front_matter).map_err(|e| Error::OperationFailed {
        operation: "build_prompt_file".to_string(),
        cause: e.to_string(),
    })?;

    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n\n{prompt}"))
}

fn placeholder_arguments(body: &str) -> Vec<PromptArgument> {
    let mut seen = HashSet::new();
    PLACEHOLDER_PATTERN
        .captures_iter(body)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str())
        .filter(|name| seen.insert(*name))
        .map(|name| PromptArgument::required(name, ""))
        .collect()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

//! Data models for gistpad.
//!
//! This module contains the gist documents returned by the GitHub API, the
//! predicates that classify them, and the prompt definitions derived from
//! the prompts gist.

mod gist;
mod prompt;

pub use gist::{
    ARCHIVED_SUFFIX, DAILY_NOTES_DESCRIPTION, EMPTY_FILE_CONTENT, FileSummary, GIST_URI_PREFIX,
    Gist, GistComment, GistFile, GistOwner, GistSummary, PROMPTS_DESCRIPTION, STARRED_SUFFIX,
    archived_description, gist_content, gistpad_share_url, gistpad_url, is_archived_gist,
    is_content_loaded, is_daily_note_gist, is_markdown_gist, is_prompt_gist,
    unarchived_description,
};
pub use prompt::{
    PromptArgument, PromptDefinition, build_prompt_file, parse_prompt_file, prompt_filename,
    prompts_from_gist, render_prompt, split_front_matter,
};

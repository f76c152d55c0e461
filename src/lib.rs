//! # Gistpad
//!
//! Personal notes, daily todos and reusable prompts backed by GitHub Gists,
//! served to AI agents over the Model Context Protocol.
//!
//! ## Features
//!
//! - Gist resources (`gist:///{id}`) with list-changed and per-gist update notifications
//! - Tools to create, edit, archive, star and comment on gists
//! - A daily-notes gist and a prompts gist discovered by description
//! - Prompts derived from the markdown files of the prompts gist
//!
//! ## Architecture
//!
//! Every handler goes through a [`GistStore`], an in-memory cache of the
//! remote gist collection. Mutating handlers call the remote API first and
//! then push the returned document into the store, which decides which
//! change notifications to emit.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gistpad::github::GithubClient;
//! use gistpad::store::{GistStore, NoopNotifier};
//! use std::sync::Arc;
//!
//! let client = Arc::new(GithubClient::new(token));
//! let store = GistStore::owned(client, Arc::new(NoopNotifier));
//! let gists = store.get_all(false)?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod github;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod store;

// Re-exports for convenience
pub use config::{FeatureFlags, GistpadConfig};
pub use github::{DocumentClient, DocumentClientExt, GithubClient};
pub use models::{Gist, GistComment, GistFile};
pub use store::{ChangeNotifier, GistStore, OwnedGists, StarredGists};

/// Error type for gistpad operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed tool arguments, failed preconditions (archiving daily notes, ambiguous edits) |
/// | `NotFound` | A gist, file, comment, prompt or daily note does not exist |
/// | `Remote` | The GitHub API answered with a non-2xx status |
/// | `OperationFailed` | Transport failures, undecodable responses, I/O and config errors |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - JSON deserialization fails in MCP tool handlers
    /// - A required string argument is empty
    /// - A domain rule rejects the request before any remote call
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested entity does not exist.
    ///
    /// The message names the missing gist id, filename or prompt.
    #[error("{0}")]
    NotFound(String),

    /// The remote service rejected a request.
    #[error("GitHub API error: {status} - {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Response body returned by the service.
        message: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - The HTTP request could not be sent or timed out
    /// - A response body is not the expected JSON document
    /// - Filesystem I/O errors occur (config, log file)
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns true for errors caused by the caller's parameters.
    #[must_use]
    pub const fn is_invalid_params(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound(_))
    }
}

/// Result type alias for gistpad operations.
pub type Result<T> = std::result::Result<T, Error>;

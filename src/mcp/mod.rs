//! MCP server implementation.
//!
//! Exposes the user's gists to AI agents over the Model Context Protocol.
//!
//! ## Features
//!
//! - **Tools**: gist, file, daily note, prompt, comment, archive and star
//!   management
//! - **Resources**: `gist:///{id}`, `gist:///{id}/raw` and
//!   `gist:///{id}/comments`, with subscriptions
//! - **Prompts**: one prompt per markdown file of the prompts gist
//!
//! ## Usage
//!
//! ```bash
//! GITHUB_TOKEN=... gistpad serve --prompts --daily
//! ```
//!
//! ### Client Configuration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "gistpad": {
//!       "command": "gistpad",
//!       "args": ["serve"],
//!       "env": { "GITHUB_TOKEN": "<token>" }
//!     }
//!   }
//! }
//! ```

// Allow option_if_let_else for clearer match statements.
#![allow(clippy::option_if_let_else)]
// Allow match_same_arms for explicit enum handling with default fallback.
#![allow(clippy::match_same_arms)]
// Handlers take arguments by value to match the tool dispatch signature.
#![allow(clippy::needless_pass_by_value)]

mod context;
mod dispatch;
mod notifier;
mod prompts;
mod resources;
mod server;
mod tool_types;
mod tools;

pub use context::GistContext;
pub use dispatch::McpMethod;
pub use notifier::{JsonRpcNotifier, SharedOutput, stdout_output};
pub use prompts::{PromptContent, PromptMessage, PromptRegistry};
pub use resources::{
    GistUri, ResourceAnnotations, ResourceContent, ResourceDefinition, ResourceHandler,
    build_resource_list, display_name,
};
pub use server::{Interrupter, McpServer, ServerSession, SessionEnd};
pub use tools::{ToolContent, ToolDefinition, ToolName, ToolRegistry, ToolResult};

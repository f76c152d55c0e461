//! MCP method dispatch.
//!
//! JSON-RPC method names are parsed into [`McpMethod`] once, and the server
//! matches on the variant instead of on strings.
//!
//! ```text
//! McpMethod (enum)
//!   ├── Initialize
//!   ├── Notification(String)      notifications/*, never answered
//!   ├── Ping
//!   ├── ListTools / CallTool
//!   ├── ListResources / ReadResource / ListResourceTemplates
//!   ├── Subscribe / Unsubscribe
//!   ├── ListPrompts / GetPrompt
//!   └── Unknown(String)
//! ```

use std::fmt;

/// MCP method identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum McpMethod {
    /// Initialize the MCP session.
    Initialize,
    /// Any client notification (`notifications/initialized`, cancellations).
    Notification(String),
    /// Ping the server (health check).
    Ping,
    /// List available tools.
    ListTools,
    /// Call a specific tool.
    CallTool,
    /// List gist resources.
    ListResources,
    /// Read a gist resource.
    ReadResource,
    /// List resource templates.
    ListResourceTemplates,
    /// Subscribe to a gist resource.
    Subscribe,
    /// Unsubscribe from a gist resource.
    Unsubscribe,
    /// List prompts from the prompts gist.
    ListPrompts,
    /// Render a prompt.
    GetPrompt,
    /// Unknown method (for error handling).
    Unknown(String),
}

impl McpMethod {
    /// Returns the MCP protocol method name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Initialize => "initialize",
            Self::Ping => "ping",
            Self::ListTools => "tools/list",
            Self::CallTool => "tools/call",
            Self::ListResources => "resources/list",
            Self::ReadResource => "resources/read",
            Self::ListResourceTemplates => "resources/templates/list",
            Self::Subscribe => "resources/subscribe",
            Self::Unsubscribe => "resources/unsubscribe",
            Self::ListPrompts => "prompts/list",
            Self::GetPrompt => "prompts/get",
            Self::Notification(s) | Self::Unknown(s) => s.as_str(),
        }
    }

    /// Returns true if this is a known method.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Returns true for client notifications, which get no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        matches!(self, Self::Notification(_))
    }

    /// Returns true for the prompt methods gated by the prompts feature.
    #[must_use]
    pub const fn is_prompt_method(&self) -> bool {
        matches!(self, Self::ListPrompts | Self::GetPrompt)
    }

    /// Returns all known request methods.
    #[must_use]
    pub const fn known_methods() -> &'static [Self] {
        &[
            Self::Initialize,
            Self::Ping,
            Self::ListTools,
            Self::CallTool,
            Self::ListResources,
            Self::ReadResource,
            Self::ListResourceTemplates,
            Self::Subscribe,
            Self::Unsubscribe,
            Self::ListPrompts,
            Self::GetPrompt,
        ]
    }
}

impl From<&str> for McpMethod {
    fn from(s: &str) -> Self {
        match s {
            "initialize" => Self::Initialize,
            "ping" => Self::Ping,
            "tools/list" => Self::ListTools,
            "tools/call" => Self::CallTool,
            "resources/list" => Self::ListResources,
            "resources/read" => Self::ReadResource,
            "resources/templates/list" => Self::ListResourceTemplates,
            "resources/subscribe" => Self::Subscribe,
            "resources/unsubscribe" => Self::Unsubscribe,
            "prompts/list" => Self::ListPrompts,
            "prompts/get" => Self::GetPrompt,
            notification if notification.starts_with("notifications/") => {
                Self::Notification(notification.to_string())
            },
            unknown => Self::Unknown(unknown.to_string()),
        }
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

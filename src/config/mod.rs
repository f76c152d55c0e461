//! Configuration management.
//!
//! Values are layered, lowest precedence first: built-in defaults, the TOML
//! config file, environment variables (a `.env` file is loaded by the binary
//! beforehand), then command-line flags applied by the caller.

mod features;

pub use features::FeatureFlags;

use crate::github::{GithubClient, HttpConfig};
use crate::store::DEFAULT_REFRESH_INTERVAL;
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration for gistpad.
#[derive(Debug)]
pub struct GistpadConfig {
    /// GitHub personal access token with the `gist` scope.
    pub github_token: Option<SecretString>,
    /// Gists API base URL.
    pub api_base_url: String,
    /// Feature flags.
    pub features: FeatureFlags,
    /// Interval between background refreshes.
    pub refresh_interval: Duration,
    /// HTTP client timeouts.
    pub http: HttpConfig,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging settings as read from config and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `tracing` filter directive (for example `gistpad=debug`).
    pub filter: Option<String>,
    /// Output format: `pretty` or `json`.
    pub format: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// GitHub token. Prefer the `GITHUB_TOKEN` environment variable.
    pub github_token: Option<String>,
    /// API base URL.
    pub api_base_url: Option<String>,
    /// Background refresh interval in seconds.
    pub refresh_interval_secs: Option<u64>,
    /// Feature flags.
    pub features: Option<ConfigFileFeatures>,
    /// HTTP settings.
    pub http: Option<ConfigFileHttp>,
    /// Logging settings.
    pub logging: Option<ConfigFileLogging>,
}

/// Features section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileFeatures {
    /// Markdown-only listing.
    pub markdown_only: Option<bool>,
    /// Include starred gists.
    pub include_starred: Option<bool>,
    /// Include archived gists.
    pub include_archived: Option<bool>,
    /// Include the daily-notes gist.
    pub include_daily: Option<bool>,
    /// Expose prompts.
    pub include_prompts: Option<bool>,
}

/// HTTP section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileHttp {
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Filter directive.
    pub filter: Option<String>,
    /// Output format.
    pub format: Option<String>,
    /// Log file path.
    pub file: Option<String>,
}

impl Default for GistpadConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            api_base_url: GithubClient::DEFAULT_BASE_URL.to_string(),
            features: FeatureFlags::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            http: HttpConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl GistpadConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/gistpad/` on macOS)
    /// 2. XDG config dir (`~/.config/gistpad/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("gistpad").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("gistpad")
                .join("config.toml"),
        ];

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                },
            }
        }

        Self::default()
    }

    /// Loads the file configuration (explicit path or default location)
    /// and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Converts a `ConfigFile` to `GistpadConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(token) = file.github_token.filter(|t| !t.trim().is_empty()) {
            config.github_token = Some(SecretString::from(token));
        }
        if let Some(url) = file.api_base_url {
            config.api_base_url = url;
        }
        if let Some(secs) = file.refresh_interval_secs {
            config.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(features) = file.features {
            if let Some(v) = features.markdown_only {
                config.features.markdown_only = v;
            }
            if let Some(v) = features.include_starred {
                config.features.include_starred = v;
            }
            if let Some(v) = features.include_archived {
                config.features.include_archived = v;
            }
            if let Some(v) = features.include_daily {
                config.features.include_daily = v;
            }
            if let Some(v) = features.include_prompts {
                config.features.include_prompts = v;
            }
        }
        if let Some(http) = file.http {
            if let Some(v) = http.timeout_ms {
                config.http.timeout_ms = v;
            }
            if let Some(v) = http.connect_timeout_ms {
                config.http.connect_timeout_ms = v;
            }
        }
        if let Some(logging) = file.logging {
            config.logging = LoggingSettings {
                filter: logging.filter,
                format: logging.format,
                file: logging.file.map(PathBuf::from),
            };
        }

        config
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(token) = env_string("GITHUB_TOKEN") {
            self.github_token = Some(SecretString::from(token));
        }
        if let Some(url) = env_string("GISTPAD_API_URL") {
            self.api_base_url = url;
        }
        if let Some(secs) = env_string("GISTPAD_REFRESH_INTERVAL_SECS").and_then(|v| v.parse().ok())
        {
            self.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(format) = env_string("GISTPAD_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        if let Some(file) = env_string("GISTPAD_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
        self.http = self.http.with_env_overrides();
        self
    }

    /// Enables the given feature flags in addition to the configured ones.
    #[must_use]
    pub const fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = self.features.union(features);
        self
    }

    /// Sets the refresh interval.
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the GitHub token.
    #[must_use]
    pub fn with_github_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(SecretString::from(token.into()));
        self
    }

    /// Returns the GitHub token.
    ///
    /// # Errors
    ///
    /// Returns an error if no token was configured.
    pub fn github_token(&self) -> Result<SecretString> {
        self.github_token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_string()))
            .ok_or_else(|| Error::OperationFailed {
                operation: "load_github_token".to_string(),
                cause: "GITHUB_TOKEN is not set; create a token with the `gist` scope".to_string(),
            })
    }

    /// Builds the GitHub client described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no token was configured.
    pub fn github_client(&self) -> Result<GithubClient> {
        Ok(GithubClient::new(self.github_token()?)
            .with_base_url(self.api_base_url.as_str())
            .with_http_config(self.http))
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

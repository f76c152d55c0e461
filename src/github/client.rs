//! GitHub Gists API client.

use super::{DocumentClient, HttpConfig, build_http_client};
use crate::{Error, Result};
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

/// Blocking HTTPS client for the GitHub Gists API.
pub struct GithubClient {
    /// Personal access token with the `gist` scope.
    token: SecretString,
    /// Base URL all paths are appended to.
    base_url: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GithubClient {
    /// Default API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.github.com/gists";

    /// Media type requested from the API.
    const ACCEPT_HEADER: &'static str = "application/vnd.github.v3+json";

    /// Creates a new client for the public GitHub API.
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self {
            token,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            client: build_http_client(HttpConfig::from_env()),
        }
    }

    /// Sets the API base URL (GitHub Enterprise or a test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and returns the decoded body.
    ///
    /// `204 No Content` and empty bodies decode as `null`.
    fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(method = %method, path = %path, "Sending GitHub API request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(self.token.expose_secret())
            .header(ACCEPT, HeaderValue::from_static(Self::ACCEPT_HEADER));
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            tracing::error!(
                method = %method,
                path = %path,
                error = %e,
                error_kind = error_kind,
                is_timeout = e.is_timeout(),
                is_connect = e.is_connect(),
                "GitHub API request failed"
            );
            Error::OperationFailed {
                operation: "github_request".to_string(),
                cause: format!("{error_kind} error: {e}"),
            }
        })?;

        let status = response.status();
        let text = response.text().map_err(|e| Error::OperationFailed {
            operation: "github_read_body".to_string(),
            cause: e.to_string(),
        })?;

        if !status.is_success() {
            tracing::error!(
                method = %method,
                path = %path,
                status = %status,
                body = %text,
                "GitHub API returned error status"
            );
            return Err(Error::Remote {
                status: status.as_u16(),
                message: text,
            });
        }

        if status == reqwest::StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| Error::OperationFailed {
            operation: "github_parse_body".to_string(),
            cause: format!("Invalid JSON: {e}"),
        })
    }
}

impl DocumentClient for GithubClient {
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.request(Method::GET, path, params, None)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, &[], Some(body))
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::PATCH, path, &[], Some(body))
    }

    fn put(&self, path: &str) -> Result<()> {
        self.request(Method::PUT, path, &[], None).map(drop)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.request(Method::DELETE, path, &[], None).map(drop)
    }
}

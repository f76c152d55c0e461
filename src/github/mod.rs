//! Remote document client for the GitHub Gists API.
//!
//! The store and the tool handlers only depend on [`DocumentClient`], a
//! small get/post/patch/put/delete capability rooted at the gists base path.
//! [`GithubClient`] is the HTTPS implementation; tests substitute an
//! in-memory client.

mod client;

pub use client::GithubClient;

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Authenticated access to a document collection rooted at a base path.
///
/// Paths are relative to the base (`""` is the collection itself, `/{id}`
/// a single gist). Any non-2xx response is returned as [`Error::Remote`];
/// implementations never retry.
pub trait DocumentClient: Send + Sync {
    /// Fetches a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value>;

    /// Creates a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    fn post(&self, path: &str, body: &Value) -> Result<Value>;

    /// Partially updates a document.
    ///
    /// A file entry set to `null` deletes that file; a `filename` key
    /// renames it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    fn patch(&self, path: &str, body: &Value) -> Result<Value>;

    /// Sends a body-less PUT (used to star a gist).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    fn put(&self, path: &str) -> Result<()>;

    /// Deletes a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    fn delete(&self, path: &str) -> Result<()>;
}

/// Typed helpers over [`DocumentClient`].
pub trait DocumentClientExt: DocumentClient {
    /// Fetches and decodes a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode to `T`.
    fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        decode(path, self.get(path, params)?)
    }

    /// Creates a document and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode to `T`.
    fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        decode(path, self.post(path, &encode(body)?)?)
    }

    /// Patches a document and decodes the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode to `T`.
    fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        decode(path, self.patch(path, &encode(body)?)?)
    }
}

impl<C: DocumentClient + ?Sized> DocumentClientExt for C {}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::OperationFailed {
        operation: "encode_request".to_string(),
        cause: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::OperationFailed {
        operation: "decode_response".to_string(),
        cause: format!("{path}: {e}"),
    })
}

/// HTTP client configuration for the GitHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl HttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(timeout_ms) = env_u64("GISTPAD_HTTP_TIMEOUT_MS") {
            self.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = env_u64("GISTPAD_HTTP_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = connect_timeout_ms;
        }
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: HttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder()
        .user_agent(concat!("gistpad/", env!("CARGO_PKG_VERSION")));
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build GitHub HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

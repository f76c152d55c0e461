//! Shared fixtures for integration tests.
//!
//! [`FakeGists`] is an in-memory stand-in for the GitHub Gists API: it keeps
//! full gist documents, serves content-less summaries from the listing
//! endpoints, applies patches the way the API does, and records every call.
//! [`RecordingNotifier`] captures the change events a store emits.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use gistpad::config::FeatureFlags;
use gistpad::mcp::GistContext;
use gistpad::store::{ChangeNotifier, Notification};
use gistpad::{DocumentClient, Error, Gist, Result};
use serde_json::{Map, Value, json};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

/// Login reported as the owner of every fake gist.
pub const OWNER: &str = "octocat";

// ============================================================================
// Fake remote service
// ============================================================================

#[derive(Default)]
struct State {
    gists: Vec<Value>,
    starred: BTreeSet<String>,
    comments: HashMap<String, Vec<Value>>,
    next_id: u64,
    clock: i64,
    calls: Vec<String>,
    fail_next: Option<u16>,
}

impl State {
    fn now(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        base_time() + Duration::seconds(self.clock)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.gists
            .iter()
            .position(|g| g["id"] == id)
            .ok_or_else(not_found)
    }
}

/// In-memory gist service.
#[derive(Default)]
pub struct FakeGists {
    state: Mutex<State>,
}

impl FakeGists {
    /// Creates an empty account.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a gist with the given files.
    pub fn with_gist(self, id: &str, description: &str, files: &[(&str, &str)]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let now = state.now();
            state.gists.push(gist_doc(id, description, files, now));
        }
        self
    }

    /// Seeds a gist and stars it.
    pub fn with_starred_gist(self, id: &str, description: &str, files: &[(&str, &str)]) -> Self {
        let this = self.with_gist(id, description, files);
        this.state.lock().unwrap().starred.insert(id.to_string());
        this
    }

    /// Returns every recorded call as `METHOD path`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Counts recorded calls equal to `call`.
    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Makes the next request fail with `status`.
    pub fn fail_next(&self, status: u16) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    /// Returns the remote copy of a gist.
    pub fn remote(&self, id: &str) -> Option<Gist> {
        let state = self.state.lock().unwrap();
        state
            .gists
            .iter()
            .find(|g| g["id"] == id)
            .map(|g| serde_json::from_value(g.clone()).unwrap())
    }

    /// Number of gists held remotely.
    pub fn remote_count(&self) -> usize {
        self.state.lock().unwrap().gists.len()
    }

    /// Changes a gist description as another client would.
    pub fn edit_remotely(&self, id: &str, description: &str) {
        let mut state = self.state.lock().unwrap();
        let now = state.now();
        let index = state.position(id).unwrap();
        let gist = &mut state.gists[index];
        gist["description"] = json!(description);
        gist["updated_at"] = json!(now);
    }

    fn record(&self, call: String) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.fail_next.take() {
            Some(status) => Err(Error::Remote {
                status,
                message: "Service Unavailable".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn list(&self, params: &[(&str, String)]) -> Value {
        let state = self.state.lock().unwrap();
        let param = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, v)| v.parse::<usize>().ok())
        };
        let per_page = param("per_page").unwrap_or(30);
        let page = param("page").unwrap_or(1);

        Value::Array(
            state
                .gists
                .iter()
                .skip((page - 1) * per_page)
                .take(per_page)
                .map(summary)
                .collect(),
        )
    }

    fn starred(&self) -> Value {
        let state = self.state.lock().unwrap();
        Value::Array(
            state
                .gists
                .iter()
                .filter(|g| g["id"].as_str().is_some_and(|id| state.starred.contains(id)))
                .map(summary)
                .collect(),
        )
    }

    fn create(&self, body: &Value) -> Value {
        let mut state = self.state.lock().unwrap();
        let id = format!("new{}", state.next_id());
        let now = state.now();
        let files: Vec<(String, String)> = body["files"]
            .as_object()
            .map(|files| {
                files
                    .iter()
                    .map(|(name, file)| {
                        let content = file["content"].as_str().unwrap_or_default();
                        (name.clone(), content.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();
        let refs: Vec<(&str, &str)> = files
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_str()))
            .collect();

        let mut gist = gist_doc(
            &id,
            body["description"].as_str().unwrap_or_default(),
            &refs,
            now,
        );
        gist["public"] = json!(body["public"].as_bool().unwrap_or(false));
        state.gists.push(gist.clone());
        gist
    }

    fn apply_patch(&self, id: &str, body: &Value) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        let index = state.position(id)?;
        let now = state.now();
        let gist = &mut state.gists[index];

        if let Some(description) = body.get("description") {
            gist["description"] = description.clone();
        }
        if let Some(files) = body.get("files").and_then(Value::as_object) {
            let existing = gist["files"].as_object_mut().unwrap();
            for (name, change) in files {
                if change.is_null() {
                    existing.remove(name);
                    continue;
                }
                let content = change
                    .get("content")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| {
                        existing
                            .get(name)
                            .and_then(|f| f["content"].as_str())
                            .map(str::to_string)
                    })
                    .unwrap_or_default();
                let target = change
                    .get("filename")
                    .and_then(Value::as_str)
                    .unwrap_or(name)
                    .to_string();
                existing.remove(name);
                existing.insert(target.clone(), file_doc(&target, &content));
            }
        }
        gist["updated_at"] = json!(now);
        Ok(gist.clone())
    }

    fn comments(&self, id: &str) -> Result<Value> {
        let state = self.state.lock().unwrap();
        state.position(id)?;
        Ok(Value::Array(
            state.comments.get(id).cloned().unwrap_or_default(),
        ))
    }

    fn add_comment(&self, id: &str, body: &Value) -> Result<Value> {
        let mut state = self.state.lock().unwrap();
        let index = state.position(id)?;
        let comment_id = state.next_id();
        let now = state.now();
        let comment = json!({
            "id": comment_id,
            "body": body["body"],
            "user": { "login": OWNER },
            "created_at": now,
            "updated_at": now,
        });
        state
            .comments
            .entry(id.to_string())
            .or_default()
            .push(comment.clone());
        let count = state.comments[id].len();
        state.gists[index]["comments"] = json!(count);
        Ok(comment)
    }
}

impl DocumentClient for FakeGists {
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.record(format!("GET {path}"))?;
        match segments(path).as_slice() {
            [] => Ok(self.list(params)),
            ["starred"] => Ok(self.starred()),
            [id] => {
                let state = self.state.lock().unwrap();
                let index = state.position(id)?;
                Ok(state.gists[index].clone())
            },
            [id, "comments"] => self.comments(id),
            _ => Err(not_found()),
        }
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.record(format!("POST {path}"))?;
        match segments(path).as_slice() {
            [] => Ok(self.create(body)),
            [id, "comments"] => self.add_comment(id, body),
            _ => Err(not_found()),
        }
    }

    fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.record(format!("PATCH {path}"))?;
        match segments(path).as_slice() {
            [id] => self.apply_patch(id, body),
            _ => Err(not_found()),
        }
    }

    fn put(&self, path: &str) -> Result<()> {
        self.record(format!("PUT {path}"))?;
        let mut state = self.state.lock().unwrap();
        match segments(path).as_slice() {
            [id, "star"] => {
                state.position(id)?;
                state.starred.insert((*id).to_string());
                Ok(())
            },
            _ => Err(not_found()),
        }
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.record(format!("DELETE {path}"))?;
        let mut state = self.state.lock().unwrap();
        match segments(path).as_slice() {
            [id] => {
                let index = state.position(id)?;
                state.gists.remove(index);
                state.starred.remove(*id);
                Ok(())
            },
            [id, "star"] => {
                state.starred.remove(*id);
                Ok(())
            },
            [id, "comments", comment_id] => {
                let comments = state.comments.get_mut(*id).ok_or_else(not_found)?;
                let before = comments.len();
                comments.retain(|c| c["id"].to_string() != *comment_id);
                if comments.len() == before {
                    return Err(not_found());
                }
                Ok(())
            },
            _ => Err(not_found()),
        }
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn not_found() -> Error {
    Error::Remote {
        status: 404,
        message: "Not Found".to_string(),
    }
}

/// Base timestamp of the fake clock.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn file_doc(name: &str, content: &str) -> Value {
    let (mime, language) = if name.ends_with(".md") {
        ("text/markdown", "Markdown")
    } else {
        ("text/plain", "Text")
    };
    json!({
        "filename": name,
        "type": mime,
        "language": language,
        "raw_url": format!("https://gist.githubusercontent.com/{OWNER}/raw/{name}"),
        "size": content.len(),
        "content": content,
    })
}

fn gist_doc(id: &str, description: &str, files: &[(&str, &str)], now: DateTime<Utc>) -> Value {
    let files: Map<String, Value> = files
        .iter()
        .map(|(name, content)| ((*name).to_string(), file_doc(name, content)))
        .collect();
    json!({
        "id": id,
        "description": description,
        "files": files,
        "public": false,
        "created_at": now,
        "updated_at": now,
        "owner": { "login": OWNER },
        "comments": 0,
    })
}

/// Strips file content, as the listing endpoints do.
fn summary(gist: &Value) -> Value {
    let mut gist = gist.clone();
    if let Some(files) = gist["files"].as_object_mut() {
        for file in files.values_mut() {
            if let Some(file) = file.as_object_mut() {
                file.remove("content");
            }
        }
    }
    gist
}

// ============================================================================
// Gist builders
// ============================================================================

/// Builds a gist with content for direct store tests.
pub fn gist(id: &str, description: &str, files: &[(&str, &str)], updated_secs: i64) -> Gist {
    let doc = gist_doc(
        id,
        description,
        files,
        base_time() + Duration::seconds(updated_secs),
    );
    serde_json::from_value(doc).unwrap()
}

/// Builds a gist whose files carry no content.
pub fn summary_gist(id: &str, description: &str, files: &[&str], updated_secs: i64) -> Gist {
    let files: Vec<(&str, &str)> = files.iter().map(|name| (*name, "")).collect();
    let doc = gist_doc(
        id,
        description,
        &files,
        base_time() + Duration::seconds(updated_secs),
    );
    serde_json::from_value(summary(&doc)).unwrap()
}

// ============================================================================
// Notification capture
// ============================================================================

/// Records every change event.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Returns and clears the recorded events.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Returns the recorded events without clearing them.
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }
}

impl ChangeNotifier for RecordingNotifier {
    fn resource_list_changed(&self) {
        self.events
            .lock()
            .unwrap()
            .push(Notification::ResourceListChanged);
    }

    fn resource_changed(&self, gist_id: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Notification::ResourceChanged(gist_id.to_string()));
    }

    fn prompt_list_changed(&self) {
        self.events
            .lock()
            .unwrap()
            .push(Notification::PromptListChanged);
    }
}

/// Builds a handler context over a fake account.
pub fn context(
    remote: &Arc<FakeGists>,
    features: FeatureFlags,
) -> (Arc<GistContext>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let context = GistContext::new(
        Arc::clone(remote) as Arc<dyn DocumentClient>,
        Arc::clone(&notifier) as Arc<dyn ChangeNotifier>,
        features,
    );
    (Arc::new(context), notifier)
}

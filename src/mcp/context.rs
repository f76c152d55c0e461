//! Shared state handed to every MCP handler.

use crate::config::FeatureFlags;
use crate::github::DocumentClient;
use crate::store::{ChangeNotifier, GistStore, OwnedGists, Refreshable, StarredGists};
use std::sync::Arc;

/// Stores, remote client and feature flags shared by resources, prompts and
/// tools.
pub struct GistContext {
    /// Remote client for live reads and mutations.
    pub client: Arc<dyn DocumentClient>,
    /// The user's own gists.
    pub gists: Arc<GistStore<OwnedGists>>,
    /// The user's starred gists.
    pub starred: Arc<GistStore<StarredGists>>,
    /// Enabled features.
    pub features: FeatureFlags,
}

impl GistContext {
    /// Creates both stores over the same client and notifier.
    ///
    /// The starred store only notifies when starred gists are listed as
    /// resources.
    #[must_use]
    pub fn new(
        client: Arc<dyn DocumentClient>,
        notifier: Arc<dyn ChangeNotifier>,
        features: FeatureFlags,
    ) -> Self {
        let gists = GistStore::owned(Arc::clone(&client), Arc::clone(&notifier))
            .with_markdown_only(features.markdown_only);
        let starred = GistStore::starred(Arc::clone(&client), notifier)
            .with_notifications(features.include_starred)
            .with_markdown_only(features.markdown_only);

        Self {
            client,
            gists: Arc::new(gists),
            starred: Arc::new(starred),
            features,
        }
    }

    /// Returns the stores refreshed by the background task.
    #[must_use]
    pub fn refreshables(&self) -> Vec<Arc<dyn Refreshable>> {
        vec![
            Arc::clone(&self.gists) as Arc<dyn Refreshable>,
            Arc::clone(&self.starred) as Arc<dyn Refreshable>,
        ]
    }
}

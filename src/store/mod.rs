//! In-memory gist cache with change notifications.
//!
//! A [`GistStore`] owns a snapshot of a remote gist collection. The snapshot
//! is loaded lazily on the first [`GistStore::get_all`] and then kept in step
//! with the remote service by the handlers, which push every document the
//! API returns back through [`add`](GistStore::add),
//! [`update`](GistStore::update) and [`remove`](GistStore::remove). The
//! store decides which change events each mutation implies and hands them
//! to a [`ChangeNotifier`] once the cache lock is released.
//!
//! # Store Variants
//!
//! | Store | Fetch strategy | Notifications | Extras |
//! |-------|----------------|---------------|--------|
//! | `GistStore<OwnedGists>` | paginated listing | enabled | daily-notes and prompts gists |
//! | `GistStore<StarredGists>` | single `/starred` request | disabled by default | none |
//!
//! Mutations before the first load are silent no-ops; they never trigger an
//! implicit fetch.

mod fetch;
mod notify;
mod refresh;

pub use fetch::{GistFetcher, OwnedGists, StarredGists};
pub use notify::{ChangeNotifier, NoopNotifier, Notification};
pub use refresh::{BackgroundRefresh, DEFAULT_REFRESH_INTERVAL, Refreshable};

use crate::Result;
use crate::github::{DocumentClient, DocumentClientExt};
use crate::models::{
    Gist, is_content_loaded, is_daily_note_gist, is_markdown_gist, is_prompt_gist,
};
use std::collections::HashSet;
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

/// Cache snapshot state.
#[derive(Debug, Default)]
enum CacheState {
    /// Nothing fetched yet (or invalidated).
    #[default]
    NotLoaded,
    /// The last fetched collection, with local mutations applied.
    Loaded(Vec<Gist>),
}

/// Ids of the gists singled out by their description.
///
/// Discovered by a full fetch or set directly when a handler creates one.
/// Never cleared by [`GistStore::invalidate`]; a stale id simply resolves
/// to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistinguishedGists {
    /// Id of the daily-notes gist.
    pub daily_notes_id: Option<String>,
    /// Id of the prompts gist.
    pub prompts_id: Option<String>,
}

impl DistinguishedGists {
    /// Records the first daily-notes and prompts gists in `gists`.
    ///
    /// Ids already known are kept when no match is found.
    fn discover(&mut self, gists: &[Gist]) {
        if let Some(gist) = gists.iter().find(|g| is_daily_note_gist(g)) {
            self.daily_notes_id = Some(gist.id.clone());
        }
        if let Some(gist) = gists.iter().find(|g| is_prompt_gist(g)) {
            self.prompts_id = Some(gist.id.clone());
        }
    }
}

/// Cache of a remote gist collection, parameterized by how it is listed.
pub struct GistStore<F: GistFetcher> {
    fetcher: F,
    client: Arc<dyn DocumentClient>,
    notifier: Arc<dyn ChangeNotifier>,
    notifications_enabled: bool,
    markdown_only: bool,
    cache: Mutex<CacheState>,
    subscriptions: RwLock<HashSet<String>>,
    distinguished: RwLock<DistinguishedGists>,
}

impl<F: GistFetcher> GistStore<F> {
    /// Creates a store with notifications enabled and no markdown filter.
    #[must_use]
    pub fn new(
        fetcher: F,
        client: Arc<dyn DocumentClient>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            fetcher,
            client,
            notifier,
            notifications_enabled: true,
            markdown_only: false,
            cache: Mutex::new(CacheState::NotLoaded),
            subscriptions: RwLock::new(HashSet::new()),
            distinguished: RwLock::new(DistinguishedGists::default()),
        }
    }

    /// Enables or disables change notifications.
    #[must_use]
    pub const fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications_enabled = enabled;
        self
    }

    /// Keeps only gists whose files are all markdown (or tldraw).
    #[must_use]
    pub const fn with_markdown_only(mut self, markdown_only: bool) -> Self {
        self.markdown_only = markdown_only;
        self
    }

    /// Returns the store name used in logs and metrics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        F::NAME
    }

    /// Returns the remote client this store fetches with.
    #[must_use]
    pub fn client(&self) -> &Arc<dyn DocumentClient> {
        &self.client
    }

    /// Returns true once a snapshot has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock_cache(), CacheState::Loaded(_))
    }

    /// Returns every cached gist, fetching when nothing is cached or when
    /// `force_refresh` is set.
    ///
    /// The cache lock is held across the fetch, so concurrent callers on a
    /// cold cache trigger a single fetch. A failed fetch leaves the previous
    /// snapshot in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails.
    pub fn get_all(&self, force_refresh: bool) -> Result<Vec<Gist>> {
        let mut cache = self.lock_cache();

        if !force_refresh && let CacheState::Loaded(gists) = &*cache {
            tracing::debug!(store = F::NAME, count = gists.len(), "Gist cache hit");
            return Ok(gists.clone());
        }

        metrics::counter!("gist_store_fetches_total", "store" => F::NAME).increment(1);
        let fetched = self.fetcher.fetch(self.client.as_ref())?;

        if F::DISCOVERS_DISTINGUISHED {
            self.write_distinguished().discover(&fetched);
        }

        let gists: Vec<Gist> = if self.markdown_only {
            fetched.into_iter().filter(is_markdown_gist).collect()
        } else {
            fetched
        };

        tracing::info!(store = F::NAME, count = gists.len(), "Loaded gists");
        *cache = CacheState::Loaded(gists.clone());
        Ok(gists)
    }

    /// Looks up a gist by id, loading the cache if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache has to be loaded and the fetch fails.
    pub fn find(&self, gist_id: &str) -> Result<Option<Gist>> {
        Ok(self
            .get_all(false)?
            .into_iter()
            .find(|gist| gist.id == gist_id))
    }

    /// Inserts a newly created gist.
    ///
    /// No-op when nothing is cached or the id is already present.
    pub fn add(&self, gist: Gist) {
        let event = {
            let mut cache = self.lock_cache();
            let CacheState::Loaded(gists) = &mut *cache else {
                return;
            };
            if gists.iter().any(|g| g.id == gist.id) {
                return;
            }

            let event = if is_prompt_gist(&gist) {
                Notification::PromptListChanged
            } else {
                Notification::ResourceListChanged
            };
            gists.push(gist);
            event
        };

        self.emit(&[event]);
    }

    /// Drops a gist from the cache.
    ///
    /// No-op when nothing is cached or the id is absent.
    pub fn remove(&self, gist_id: &str) {
        {
            let mut cache = self.lock_cache();
            let CacheState::Loaded(gists) = &mut *cache else {
                return;
            };
            let before = gists.len();
            gists.retain(|g| g.id != gist_id);
            if gists.len() == before {
                return;
            }
        }

        self.emit(&[Notification::ResourceListChanged]);
    }

    /// Replaces a cached gist with a fresher copy.
    ///
    /// No-op when nothing is cached or the id is unknown.
    ///
    /// An unchanged `updated_at` leaves the cache as it is, with one
    /// exception: a summary record is replaced by an incoming copy that
    /// carries file content, so content loaded by
    /// [`ensure_content_loaded`](Self::ensure_content_loaded) is kept. That
    /// replacement emits nothing. Any other equal-timestamp copy, including
    /// one with a different description, is ignored.
    ///
    /// Emits a prompt-list change for the prompts gist, a list change when
    /// the description changed, and a resource change when the gist is
    /// subscribed.
    pub fn update(&self, gist: Gist) {
        let events = {
            let mut cache = self.lock_cache();
            let CacheState::Loaded(gists) = &mut *cache else {
                return;
            };
            let Some(cached) = gists.iter_mut().find(|g| g.id == gist.id) else {
                return;
            };

            if cached.updated_at == gist.updated_at {
                // Only the summary-to-content upgrade passes an equal timestamp.
                if !is_content_loaded(cached) && is_content_loaded(&gist) {
                    *cached = gist;
                }
                return;
            }

            let description_changed = cached.description != gist.description;
            let prompts_changed = is_prompt_gist(cached) || is_prompt_gist(&gist);
            let is_prompts = is_prompt_gist(&gist);
            let gist_id = gist.id.clone();
            *cached = gist;

            let mut events = Vec::with_capacity(2);
            if prompts_changed {
                events.push(Notification::PromptListChanged);
            }
            if !is_prompts && description_changed {
                events.push(Notification::ResourceListChanged);
            }
            if self.is_subscribed(&gist_id) {
                events.push(Notification::ResourceChanged(gist_id));
            }
            events
        };

        self.emit(&events);
    }

    /// Forces a reload and announces a list change.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote listing fails.
    pub fn refresh(&self) -> Result<()> {
        self.get_all(true)?;
        self.emit(&[Notification::ResourceListChanged]);
        Ok(())
    }

    /// Drops the snapshot so the next read fetches again.
    pub fn invalidate(&self) {
        *self.lock_cache() = CacheState::NotLoaded;
    }

    /// Subscribes to content changes of a gist.
    pub fn subscribe(&self, gist_id: &str) {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(gist_id.to_string());
    }

    /// Removes a subscription.
    pub fn unsubscribe(&self, gist_id: &str) {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(gist_id);
    }

    /// Returns true if a client is subscribed to the gist.
    #[must_use]
    pub fn is_subscribed(&self, gist_id: &str) -> bool {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(gist_id)
    }

    /// Returns the gist with all file content present.
    ///
    /// Fetches the single gist when any file lacks content and feeds the
    /// result through [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns an error if the single-gist fetch fails.
    pub fn ensure_content_loaded(&self, gist: Gist) -> Result<Gist> {
        if is_content_loaded(&gist) {
            return Ok(gist);
        }

        tracing::debug!(store = F::NAME, gist_id = %gist.id, "Loading gist content");
        let loaded: Gist = self.client.get_json(&format!("/{}", gist.id), &[])?;
        self.update(loaded.clone());
        Ok(loaded)
    }

    fn emit(&self, events: &[Notification]) {
        if !self.notifications_enabled {
            return;
        }
        for event in events {
            metrics::counter!("gist_notifications_total", "kind" => event.kind()).increment(1);
            tracing::debug!(store = F::NAME, event = %event, "Emitting change notification");
            event.deliver(self.notifier.as_ref());
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, CacheState> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_distinguished(&self) -> RwLockReadGuard<'_, DistinguishedGists> {
        self.distinguished
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_distinguished(&self) -> RwLockWriteGuard<'_, DistinguishedGists> {
        self.distinguished
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl GistStore<OwnedGists> {
    /// Creates the store of the user's own gists.
    #[must_use]
    pub fn owned(client: Arc<dyn DocumentClient>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self::new(OwnedGists::default(), client, notifier)
    }

    /// Returns the known distinguished gist ids.
    #[must_use]
    pub fn distinguished(&self) -> DistinguishedGists {
        self.read_distinguished().clone()
    }

    /// Returns the daily-notes gist with content, if one is known.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the cache or the gist content fails.
    pub fn get_daily_notes(&self) -> Result<Option<Gist>> {
        self.resolve_distinguished(|ids| ids.daily_notes_id.clone())
    }

    /// Returns the prompts gist with content, if one is known.
    ///
    /// # Errors
    ///
    /// Returns an error if loading the cache or the gist content fails.
    pub fn get_prompts(&self) -> Result<Option<Gist>> {
        self.resolve_distinguished(|ids| ids.prompts_id.clone())
    }

    /// Adds a freshly created daily-notes gist and records its id.
    pub fn set_daily_notes(&self, gist: Gist) {
        let gist_id = gist.id.clone();
        self.add(gist);
        self.write_distinguished().daily_notes_id = Some(gist_id);
    }

    /// Adds a freshly created prompts gist and records its id.
    pub fn set_prompts(&self, gist: Gist) {
        let gist_id = gist.id.clone();
        self.add(gist);
        self.write_distinguished().prompts_id = Some(gist_id);
    }

    fn resolve_distinguished(
        &self,
        select: impl Fn(&DistinguishedGists) -> Option<String>,
    ) -> Result<Option<Gist>> {
        let gists = self.get_all(false)?;
        let Some(gist_id) = select(&self.read_distinguished()) else {
            return Ok(None);
        };

        match gists.into_iter().find(|g| g.id == gist_id) {
            Some(gist) => self.ensure_content_loaded(gist).map(Some),
            None => {
                tracing::debug!(gist_id = %gist_id, "Distinguished gist no longer cached");
                Ok(None)
            },
        }
    }
}

impl GistStore<StarredGists> {
    /// Creates the store of starred gists, with notifications disabled.
    #[must_use]
    pub fn starred(client: Arc<dyn DocumentClient>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self::new(StarredGists, client, notifier).with_notifications(false)
    }
}

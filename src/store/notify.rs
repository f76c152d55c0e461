//! Change-notification port.

use std::fmt;

/// Sink for the change events a [`GistStore`](super::GistStore) announces.
///
/// Calls are fire-and-forget. A notifier that fails to deliver must log and
/// return; the cache mutation that triggered the call is already applied.
pub trait ChangeNotifier: Send + Sync {
    /// The set of visible resources, or their names, may have changed.
    fn resource_list_changed(&self);

    /// The content of a subscribed gist changed.
    fn resource_changed(&self, gist_id: &str);

    /// The prompts collection changed.
    fn prompt_list_changed(&self);
}

/// A notifier that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn resource_list_changed(&self) {}

    fn resource_changed(&self, _gist_id: &str) {}

    fn prompt_list_changed(&self) {}
}

/// A change event queued while the cache lock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// See [`ChangeNotifier::resource_list_changed`].
    ResourceListChanged,
    /// See [`ChangeNotifier::resource_changed`].
    ResourceChanged(String),
    /// See [`ChangeNotifier::prompt_list_changed`].
    PromptListChanged,
}

impl Notification {
    /// Returns the metric label for this event.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ResourceListChanged => "resource_list_changed",
            Self::ResourceChanged(_) => "resource_changed",
            Self::PromptListChanged => "prompt_list_changed",
        }
    }

    /// Delivers this event to a notifier.
    pub fn deliver(&self, notifier: &dyn ChangeNotifier) {
        match self {
            Self::ResourceListChanged => notifier.resource_list_changed(),
            Self::ResourceChanged(gist_id) => notifier.resource_changed(gist_id),
            Self::PromptListChanged => notifier.prompt_list_changed(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceChanged(gist_id) => write!(f, "{}({gist_id})", self.kind()),
            _ => f.write_str(self.kind()),
        }
    }
}

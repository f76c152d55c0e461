//! Periodic background refresh of gist stores.

use super::{GistFetcher, GistStore};
use crate::{Error, Result};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default interval between background refreshes (one hour).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3600);

/// A store the background task can refresh.
pub trait Refreshable: Send + Sync {
    /// Store name used in logs.
    fn store_name(&self) -> &'static str;

    /// Forces a reload of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the reload fails.
    fn refresh_store(&self) -> Result<()>;
}

impl<F: GistFetcher> Refreshable for GistStore<F> {
    fn store_name(&self) -> &'static str {
        self.name()
    }

    fn refresh_store(&self) -> Result<()> {
        self.refresh()
    }
}

/// Handle to the background refresh thread.
///
/// The thread stops when [`shutdown`](Self::shutdown) is called or the
/// handle is dropped.
pub struct BackgroundRefresh {
    shutdown: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundRefresh {
    /// Spawns a thread that refreshes every store once per `interval`.
    ///
    /// Failures are logged and the loop keeps going; a later tick retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(stores: Vec<Arc<dyn Refreshable>>, interval: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("gist-refresh".to_string())
            .spawn(move || {
                tracing::debug!(interval_secs = interval.as_secs(), "Background refresh started");
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => refresh_all(&stores),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::debug!("Background refresh stopped");
            })
            .map_err(|e| Error::OperationFailed {
                operation: "spawn_refresh_thread".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self {
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }

    /// Stops the thread and waits for it to exit.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            // The receiver is gone if the thread already exited.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("Background refresh thread panicked");
        }
    }
}

impl Drop for BackgroundRefresh {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn refresh_all(stores: &[Arc<dyn Refreshable>]) {
    for store in stores {
        match store.refresh_store() {
            Ok(()) => tracing::debug!(store = store.store_name(), "Refreshed gist store"),
            Err(e) => tracing::warn!(
                store = store.store_name(),
                error = %e,
                "Background refresh failed"
            ),
        }
    }
}

//! Templates directory watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::Duration;

use crate::templates::store::TemplateStore;

/// Reloads a [`TemplateStore`] whenever its directory changes.
pub struct TemplateWatcher {
    store: Arc<TemplateStore>,
}

impl TemplateWatcher {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        tracing::info!(paths = ?event.paths, "Template change detected, reloading...");
                        // Errors are logged by the store; the previous snapshot stays live.
                        let _ = store.reload();
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Template watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(self.store.dir(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.store.dir(), "Template watcher started");
        Ok(watcher)
    }
}

//! Live feeds of the catalog contents.

use std::sync::Arc;

use tokio::sync::watch;

use super::CatalogEntry;

/// Live view of a full, ordered entry list.
///
/// Each write to the store replaces the value; receivers only ever observe the
/// latest list, never a diff.
pub type CatalogFeed = watch::Receiver<Arc<Vec<CatalogEntry>>>;

/// Publisher side of the "all entries" and "active entries" feeds.
pub struct CatalogFeeds {
    all: watch::Sender<Arc<Vec<CatalogEntry>>>,
    active: watch::Sender<Arc<Vec<CatalogEntry>>>,
}

impl CatalogFeeds {
    /// Create feeds seeded with the current (already ordered) contents.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let active = Self::active_subset(&entries);
        let (all, _) = watch::channel(Arc::new(entries));
        let (active, _) = watch::channel(Arc::new(active));
        Self { all, active }
    }

    /// Replace both feeds with the given ordered contents.
    pub fn publish(&self, entries: Vec<CatalogEntry>) {
        let active = Self::active_subset(&entries);
        tracing::trace!(
            total = entries.len(),
            active = active.len(),
            "Publishing catalog snapshot"
        );
        self.all.send_replace(Arc::new(entries));
        self.active.send_replace(Arc::new(active));
    }

    pub fn subscribe_all(&self) -> CatalogFeed {
        self.all.subscribe()
    }

    pub fn subscribe_active(&self) -> CatalogFeed {
        self.active.subscribe()
    }

    fn active_subset(entries: &[CatalogEntry]) -> Vec<CatalogEntry> {
        entries.iter().filter(|e| e.is_active).cloned().collect()
    }
}

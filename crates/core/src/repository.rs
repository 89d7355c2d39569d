//! Repository façade over the catalog store.
//!
//! View models, the import pipeline and the command queue only talk to
//! [`CatalogRepository`], never to a concrete store.

use std::sync::Arc;

use crate::catalog::{CatalogEntry, CatalogFeed, CatalogStore, StoreError};

/// Cheaply cloneable handle delegating to a shared [`CatalogStore`].
#[derive(Clone)]
pub struct CatalogRepository {
    store: Arc<dyn CatalogStore>,
}

impl CatalogRepository {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Every entry, including inactive ones.
    pub fn all_entries_feed(&self) -> CatalogFeed {
        self.store.observe_all()
    }

    /// Active entries only.
    pub fn active_entries_feed(&self) -> CatalogFeed {
        self.store.observe_active()
    }

    pub fn insert(&self, entry: &CatalogEntry) -> Result<i64, StoreError> {
        self.store.insert(entry)
    }

    pub fn insert_many(&self, entries: &[CatalogEntry]) -> Result<(), StoreError> {
        self.store.insert_many(entries)
    }

    pub fn update(&self, entry: &CatalogEntry) -> Result<(), StoreError> {
        self.store.update(entry)
    }

    pub fn delete(&self, entry: &CatalogEntry) -> Result<(), StoreError> {
        self.store.delete(entry)
    }

    pub fn delete_all(&self) -> Result<(), StoreError> {
        self.store.delete_all()
    }

    /// Swap the whole dataset in one storage transaction.
    pub fn replace_all(&self, entries: &[CatalogEntry]) -> Result<usize, StoreError> {
        self.store.replace_all(entries)
    }

    pub fn get(&self, id: i64) -> Result<Option<CatalogEntry>, StoreError> {
        self.store.get(id)
    }

    pub fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<CatalogEntry>, StoreError> {
        self.store.find_by_external_id(external_id)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        self.store.count()
    }
}

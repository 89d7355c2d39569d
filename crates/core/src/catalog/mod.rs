//! Medicine catalog store.
//!
//! A single table of [`CatalogEntry`] records with live feeds that re-emit the
//! full ordered contents after every write.

mod feed;
mod sqlite;
mod types;

pub use feed::{CatalogFeed, CatalogFeeds};
pub use sqlite::{SqliteCatalogStore, SCHEMA_VERSION};
pub use types::*;

pub(crate) use types::sort_entries;

/// Trait for catalog storage backends.
///
/// All list results are ordered by display name, then surrogate id.
pub trait CatalogStore: Send + Sync {
    /// Insert an entry and return its surrogate id.
    ///
    /// An entry with `id == 0` gets a fresh id. An entry whose id already
    /// exists replaces that row entirely.
    fn insert(&self, entry: &CatalogEntry) -> Result<i64, StoreError>;

    /// Insert every entry as one batch.
    fn insert_many(&self, entries: &[CatalogEntry]) -> Result<(), StoreError>;

    /// Replace the row with the entry's id. Fails with `NotFound` if absent.
    fn update(&self, entry: &CatalogEntry) -> Result<(), StoreError>;

    /// Remove the row with the entry's id. Fails with `NotFound` if absent.
    fn delete(&self, entry: &CatalogEntry) -> Result<(), StoreError>;

    /// Remove every row.
    fn delete_all(&self) -> Result<(), StoreError>;

    /// Atomically swap the whole dataset for `entries`.
    ///
    /// Either every entry is stored and the old rows are gone, or nothing
    /// changes. Returns the number of stored entries.
    fn replace_all(&self, entries: &[CatalogEntry]) -> Result<usize, StoreError>;

    /// Get an entry by surrogate id.
    fn get(&self, id: i64) -> Result<Option<CatalogEntry>, StoreError>;

    /// Find an entry by external id. With duplicates, the lowest id wins.
    fn find_by_external_id(&self, external_id: &str) -> Result<Option<CatalogEntry>, StoreError>;

    /// Number of stored entries.
    fn count(&self) -> Result<u64, StoreError>;

    /// Live feed of every entry.
    fn observe_all(&self) -> CatalogFeed;

    /// Live feed of active entries only.
    fn observe_active(&self) -> CatalogFeed;
}

//! Mock catalog store for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::catalog::{
    sort_entries, CatalogEntry, CatalogFeed, CatalogFeeds, CatalogStore, StoreError,
};

/// In-memory implementation of the CatalogStore trait.
///
/// Provides controllable behavior for testing:
/// - Fail every write with a database error
/// - Slow down writes to observe queueing
/// - Count successful writes
///
/// # Example
///
/// ```rust,ignore
/// use biocatalog_core::testing::MockCatalogStore;
///
/// let store = Arc::new(MockCatalogStore::new());
/// store.set_fail_writes(true);
///
/// let repo = CatalogRepository::new(store.clone());
/// assert!(repo.insert(&entry).is_err());
/// ```
pub struct MockCatalogStore {
    state: Mutex<MockState>,
    feeds: CatalogFeeds,
    fail_writes: AtomicBool,
    write_delay_ms: AtomicUsize,
    writes: AtomicUsize,
}

struct MockState {
    entries: Vec<CatalogEntry>,
    next_id: i64,
}

impl Default for MockCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                entries: Vec::new(),
                next_id: 1,
            }),
            feeds: CatalogFeeds::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
            write_delay_ms: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Block each write for the given duration before applying it.
    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    /// Number of writes that completed successfully.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current contents in store order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Internal("mock store lock poisoned".to_string()))
    }

    /// Shared prologue of every write: delay, then maybe fail.
    fn begin_write(&self) -> Result<(), StoreError> {
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay as u64));
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("Mock write failure".to_string()));
        }
        Ok(())
    }

    /// Shared epilogue of every write: reorder, count, publish.
    fn finish_write(&self, state: &mut MockState) {
        sort_entries(&mut state.entries);
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.feeds.publish(state.entries.clone());
    }

    fn upsert(state: &mut MockState, entry: &CatalogEntry) -> i64 {
        let mut stored = entry.clone();
        if stored.id == 0 {
            stored.id = state.next_id;
        }
        state.next_id = state.next_id.max(stored.id + 1);

        match state.entries.iter_mut().find(|e| e.id == stored.id) {
            Some(existing) => *existing = stored.clone(),
            None => state.entries.push(stored.clone()),
        }
        stored.id
    }
}

impl CatalogStore for MockCatalogStore {
    fn insert(&self, entry: &CatalogEntry) -> Result<i64, StoreError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        let id = Self::upsert(&mut state, entry);
        self.finish_write(&mut state);
        Ok(id)
    }

    fn insert_many(&self, entries: &[CatalogEntry]) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        for entry in entries {
            Self::upsert(&mut state, entry);
        }
        self.finish_write(&mut state);
        Ok(())
    }

    fn update(&self, entry: &CatalogEntry) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        match state.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => return Err(StoreError::NotFound(format!("entry id {}", entry.id))),
        }
        self.finish_write(&mut state);
        Ok(())
    }

    fn delete(&self, entry: &CatalogEntry) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        let before = state.entries.len();
        state.entries.retain(|e| e.id != entry.id);
        if state.entries.len() == before {
            return Err(StoreError::NotFound(format!("entry id {}", entry.id)));
        }
        self.finish_write(&mut state);
        Ok(())
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        state.entries.clear();
        self.finish_write(&mut state);
        Ok(())
    }

    fn replace_all(&self, entries: &[CatalogEntry]) -> Result<usize, StoreError> {
        self.begin_write()?;
        let mut state = self.lock()?;
        state.entries.clear();
        for entry in entries {
            Self::upsert(&mut state, entry);
        }
        self.finish_write(&mut state);
        Ok(entries.len())
    }

    fn get(&self, id: i64) -> Result<Option<CatalogEntry>, StoreError> {
        let state = self.lock()?;
        Ok(state.entries.iter().find(|e| e.id == id).cloned())
    }

    fn find_by_external_id(&self, external_id: &str) -> Result<Option<CatalogEntry>, StoreError> {
        let state = self.lock()?;
        Ok(state
            .entries
            .iter()
            .filter(|e| e.external_id == external_id)
            .min_by_key(|e| e.id)
            .cloned())
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.entries.len() as u64)
    }

    fn observe_all(&self) -> CatalogFeed {
        self.feeds.subscribe_all()
    }

    fn observe_active(&self) -> CatalogFeed {
        self.feeds.subscribe_active()
    }
}

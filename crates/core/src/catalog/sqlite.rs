//! SQLite-backed catalog store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{CatalogEntry, CatalogFeed, CatalogFeeds, CatalogStore, StoreError};

/// Current on-disk schema version, kept in `PRAGMA user_version`.
///
/// A database carrying any other version is wiped and recreated on open.
pub const SCHEMA_VERSION: i64 = 2;

const ENTRY_COLUMNS: &str = "id, external_id, display_name, is_active, source, \
     is_preferred_affiliate, active_ingredient, category, dosage, form, price, description, \
     key_features, common_side_effects, indicated_in, drug_interactions";

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    conn: Mutex<Connection>,
    feeds: CatalogFeeds,
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database at `path`.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        Self::initialize_schema(&conn)?;
        let entries = Self::load_all(&conn)?;
        tracing::debug!(entries = entries.len(), "Catalog store opened");
        Ok(Self {
            conn: Mutex::new(conn),
            feeds: CatalogFeeds::new(entries),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if version != SCHEMA_VERSION {
            if version != 0 {
                tracing::warn!(
                    found = version,
                    expected = SCHEMA_VERSION,
                    "Catalog schema version mismatch, recreating table (existing entries are dropped)"
                );
            }
            conn.execute_batch("DROP TABLE IF EXISTS catalog_entries;")
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS catalog_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                external_id TEXT NOT NULL,
                display_name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                source TEXT NOT NULL,
                is_preferred_affiliate INTEGER NOT NULL DEFAULT 0,
                active_ingredient TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                dosage TEXT NOT NULL DEFAULT '',
                form TEXT NOT NULL DEFAULT '',
                price TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                key_features TEXT NOT NULL DEFAULT '[]',
                common_side_effects TEXT NOT NULL DEFAULT '[]',
                indicated_in TEXT NOT NULL DEFAULT '[]',
                drug_interactions TEXT NOT NULL DEFAULT '[]'
            );

            CREATE INDEX IF NOT EXISTS idx_catalog_entries_external_id ON catalog_entries(external_id);
            CREATE INDEX IF NOT EXISTS idx_catalog_entries_display_name ON catalog_entries(display_name);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Internal("catalog connection lock poisoned".to_string()))
    }

    /// Re-read the table and push the result to every feed.
    ///
    /// Called with the connection lock held so emissions follow write order.
    fn publish(&self, conn: &Connection) -> Result<(), StoreError> {
        let entries = Self::load_all(conn)?;
        self.feeds.publish(entries);
        Ok(())
    }

    fn load_all(conn: &Connection) -> Result<Vec<CatalogEntry>, StoreError> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM catalog_entries ORDER BY display_name ASC, id ASC",
                ENTRY_COLUMNS
            ))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_entry)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(entries)
    }

    /// Write one entry, inserting or replacing by surrogate id.
    fn write_entry(conn: &Connection, entry: &CatalogEntry) -> Result<i64, StoreError> {
        let lists = EncodedLists::encode(entry)?;

        if entry.id == 0 {
            conn.execute(
                "INSERT INTO catalog_entries (external_id, display_name, is_active, source,
                    is_preferred_affiliate, active_ingredient, category, dosage, form, price,
                    description, key_features, common_side_effects, indicated_in, drug_interactions)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    &entry.external_id,
                    &entry.display_name,
                    entry.is_active,
                    &entry.source,
                    entry.is_preferred_affiliate,
                    &entry.active_ingredient,
                    &entry.category,
                    &entry.dosage,
                    &entry.form,
                    &entry.price,
                    &entry.description,
                    &lists.key_features,
                    &lists.common_side_effects,
                    &lists.indicated_in,
                    &lists.drug_interactions,
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(conn.last_insert_rowid())
        } else {
            conn.execute(
                "INSERT OR REPLACE INTO catalog_entries (id, external_id, display_name, is_active,
                    source, is_preferred_affiliate, active_ingredient, category, dosage, form, price,
                    description, key_features, common_side_effects, indicated_in, drug_interactions)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    entry.id,
                    &entry.external_id,
                    &entry.display_name,
                    entry.is_active,
                    &entry.source,
                    entry.is_preferred_affiliate,
                    &entry.active_ingredient,
                    &entry.category,
                    &entry.dosage,
                    &entry.form,
                    &entry.price,
                    &entry.description,
                    &lists.key_features,
                    &lists.common_side_effects,
                    &lists.indicated_in,
                    &lists.drug_interactions,
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
            Ok(entry.id)
        }
    }

    /// Convert a row to CatalogEntry.
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<CatalogEntry> {
        let key_features: String = row.get(12)?;
        let common_side_effects: String = row.get(13)?;
        let indicated_in: String = row.get(14)?;
        let drug_interactions: String = row.get(15)?;

        Ok(CatalogEntry {
            id: row.get(0)?,
            external_id: row.get(1)?,
            display_name: row.get(2)?,
            is_active: row.get(3)?,
            source: row.get(4)?,
            is_preferred_affiliate: row.get(5)?,
            active_ingredient: row.get(6)?,
            category: row.get(7)?,
            dosage: row.get(8)?,
            form: row.get(9)?,
            price: row.get(10)?,
            description: row.get(11)?,
            // Lists are written by this store, so a bad value means manual edits; read as empty
            key_features: serde_json::from_str(&key_features).unwrap_or_default(),
            common_side_effects: serde_json::from_str(&common_side_effects).unwrap_or_default(),
            indicated_in: serde_json::from_str(&indicated_in).unwrap_or_default(),
            drug_interactions: serde_json::from_str(&drug_interactions).unwrap_or_default(),
        })
    }
}

/// JSON-encoded list columns of one entry.
struct EncodedLists {
    key_features: String,
    common_side_effects: String,
    indicated_in: String,
    drug_interactions: String,
}

impl EncodedLists {
    fn encode(entry: &CatalogEntry) -> Result<Self, StoreError> {
        let encode = |list: &Vec<String>| {
            serde_json::to_string(list).map_err(|e| StoreError::Internal(e.to_string()))
        };
        Ok(Self {
            key_features: encode(&entry.key_features)?,
            common_side_effects: encode(&entry.common_side_effects)?,
            indicated_in: encode(&entry.indicated_in)?,
            drug_interactions: encode(&entry.drug_interactions)?,
        })
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn insert(&self, entry: &CatalogEntry) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        let id = Self::write_entry(&conn, entry)?;
        self.publish(&conn)?;
        Ok(id)
    }

    fn insert_many(&self, entries: &[CatalogEntry]) -> Result<(), StoreError> {
        let mut conn = self.lock()?;

        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        for entry in entries {
            Self::write_entry(&tx, entry)?;
        }
        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.publish(&conn)
    }

    fn update(&self, entry: &CatalogEntry) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let lists = EncodedLists::encode(entry)?;

        let rows_affected = conn
            .execute(
                "UPDATE catalog_entries SET external_id = ?, display_name = ?, is_active = ?,
                    source = ?, is_preferred_affiliate = ?, active_ingredient = ?, category = ?,
                    dosage = ?, form = ?, price = ?, description = ?, key_features = ?,
                    common_side_effects = ?, indicated_in = ?, drug_interactions = ?
                 WHERE id = ?",
                params![
                    &entry.external_id,
                    &entry.display_name,
                    entry.is_active,
                    &entry.source,
                    entry.is_preferred_affiliate,
                    &entry.active_ingredient,
                    &entry.category,
                    &entry.dosage,
                    &entry.form,
                    &entry.price,
                    &entry.description,
                    &lists.key_features,
                    &lists.common_side_effects,
                    &lists.indicated_in,
                    &lists.drug_interactions,
                    entry.id,
                ],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(format!("entry id {}", entry.id)));
        }

        self.publish(&conn)
    }

    fn delete(&self, entry: &CatalogEntry) -> Result<(), StoreError> {
        let conn = self.lock()?;

        let rows_affected = conn
            .execute("DELETE FROM catalog_entries WHERE id = ?", params![entry.id])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(format!("entry id {}", entry.id)));
        }

        self.publish(&conn)
    }

    fn delete_all(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM catalog_entries", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.publish(&conn)
    }

    fn replace_all(&self, entries: &[CatalogEntry]) -> Result<usize, StoreError> {
        let mut conn = self.lock()?;

        // Dropping the transaction without commit rolls back, so a failed
        // insert leaves the previous dataset in place
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        tx.execute("DELETE FROM catalog_entries", [])
            .map_err(|e| StoreError::Database(e.to_string()))?;
        for entry in entries {
            Self::write_entry(&tx, entry)?;
        }
        tx.commit()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.publish(&conn)?;
        Ok(entries.len())
    }

    fn get(&self, id: i64) -> Result<Option<CatalogEntry>, StoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!("SELECT {} FROM catalog_entries WHERE id = ?", ENTRY_COLUMNS),
            params![id],
            Self::row_to_entry,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn find_by_external_id(&self, external_id: &str) -> Result<Option<CatalogEntry>, StoreError> {
        let conn = self.lock()?;

        conn.query_row(
            &format!(
                "SELECT {} FROM catalog_entries WHERE external_id = ? ORDER BY id ASC LIMIT 1",
                ENTRY_COLUMNS
            ),
            params![external_id],
            Self::row_to_entry,
        )
        .optional()
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn count(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM catalog_entries", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(count as u64)
    }

    fn observe_all(&self) -> CatalogFeed {
        self.feeds.subscribe_all()
    }

    fn observe_active(&self) -> CatalogFeed {
        self.feeds.subscribe_active()
    }
}

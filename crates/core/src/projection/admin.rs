use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{CatalogEntry, CatalogFeed, StoreError};
use crate::commands::{CommandError, CommandHandle};
use crate::import::{ImportOutcome, ImportReport};
use crate::repository::CatalogRepository;

/// Errors from admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid entry: {0}")]
    Invalid(String),

    #[error("The preferred-affiliate flag of a house entry cannot be changed")]
    HousePreferenceLocked,

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl From<StoreError> for AdminError {
    fn from(e: StoreError) -> Self {
        AdminError::Command(CommandError::Store(e))
    }
}

/// Admin surface: every entry, active or not, plus mutations.
#[derive(Clone)]
pub struct AdminView {
    feed: CatalogFeed,
    commands: CommandHandle,
    house_source: String,
}

impl AdminView {
    pub fn new(
        repository: &CatalogRepository,
        commands: CommandHandle,
        house_source: impl Into<String>,
    ) -> Self {
        Self {
            feed: repository.all_entries_feed(),
            commands,
            house_source: house_source.into(),
        }
    }

    /// Every entry in store order.
    pub fn entries(&self) -> Arc<Vec<CatalogEntry>> {
        Arc::clone(&self.feed.borrow())
    }

    pub fn entry(&self, id: i64) -> Option<CatalogEntry> {
        self.feed.borrow().iter().find(|e| e.id == id).cloned()
    }

    /// Whether the preferred toggle is available for this entry.
    pub fn can_toggle_preferred(&self, entry: &CatalogEntry) -> bool {
        !entry.is_house(&self.house_source)
    }

    /// Add a new entry. Any id on the input is ignored.
    pub async fn add(&self, mut entry: CatalogEntry) -> Result<i64, AdminError> {
        validate(&entry)?;
        entry.id = 0;
        let id = self.commands.add(entry).await?;
        tracing::info!(id, "Catalog entry added");
        Ok(id)
    }

    /// Replace an existing entry.
    pub async fn edit(&self, entry: CatalogEntry) -> Result<(), AdminError> {
        validate(&entry)?;
        let id = entry.id;
        self.commands.update(entry).await?;
        tracing::info!(id, "Catalog entry updated");
        Ok(())
    }

    /// Flip `is_active` and return the stored result.
    pub async fn toggle_active(&self, id: i64) -> Result<CatalogEntry, AdminError> {
        let mut entry = self.require(id)?;
        entry.is_active = !entry.is_active;
        self.commands.update(entry.clone()).await?;
        tracing::info!(id, active = entry.is_active, "Catalog entry active flag toggled");
        Ok(entry)
    }

    /// Flip `is_preferred_affiliate`. House entries are always preferred.
    pub async fn toggle_preferred_affiliate(&self, id: i64) -> Result<CatalogEntry, AdminError> {
        let mut entry = self.require(id)?;
        if !self.can_toggle_preferred(&entry) {
            return Err(AdminError::HousePreferenceLocked);
        }
        entry.is_preferred_affiliate = !entry.is_preferred_affiliate;
        self.commands.update(entry.clone()).await?;
        tracing::info!(
            id,
            preferred = entry.is_preferred_affiliate,
            "Catalog entry preferred flag toggled"
        );
        Ok(entry)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AdminError> {
        let entry = self.require(id)?;
        self.commands.delete(entry).await?;
        tracing::info!(id, "Catalog entry deleted");
        Ok(())
    }

    /// Replace the catalog from an import file.
    pub async fn import_file(
        &self,
        path: impl Into<PathBuf>,
    ) -> Result<ImportReport, AdminError> {
        Ok(self.commands.import(path).await?)
    }

    /// Import reported as `(count, reason)`, never failing.
    pub async fn import_outcome(&self, path: impl Into<PathBuf>) -> ImportOutcome {
        match self.commands.import(path).await {
            Ok(report) => ImportOutcome::from(Ok(report)),
            Err(CommandError::Import(e)) => ImportOutcome::from(Err(e)),
            Err(e) => ImportOutcome {
                imported: 0,
                error: Some(e.to_string()),
            },
        }
    }

    fn require(&self, id: i64) -> Result<CatalogEntry, AdminError> {
        self.entry(id)
            .ok_or_else(|| StoreError::NotFound(format!("entry id {}", id)).into())
    }
}

fn validate(entry: &CatalogEntry) -> Result<(), AdminError> {
    if entry.display_name.trim().is_empty() {
        return Err(AdminError::Invalid(
            "display name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::commands::create_command_queue;
    use crate::import::ImportPipeline;
    use crate::testing::{fixtures, MockCatalogStore};

    fn admin_view(store: Arc<MockCatalogStore>) -> AdminView {
        let repository = CatalogRepository::new(store);
        let import = ImportPipeline::new(repository.clone(), fixtures::HOUSE_SOURCE);
        let (handle, worker) = create_command_queue(repository.clone(), import, 10);
        tokio::spawn(worker.run());
        AdminView::new(&repository, handle, fixtures::HOUSE_SOURCE)
    }

    #[tokio::test]
    async fn test_add_shows_inactive_entries() {
        let admin = admin_view(Arc::new(MockCatalogStore::new()));

        admin
            .add(fixtures::house_entry("med1", "Amoxil").with_active(false))
            .await
            .unwrap();

        let entries = admin.entries();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_active);
    }

    #[tokio::test]
    async fn test_add_rejects_empty_name() {
        let store = Arc::new(MockCatalogStore::new());
        let admin = admin_view(store.clone());

        let result = admin.add(CatalogEntry::new("med1", "  ")).await;
        assert!(matches!(result, Err(AdminError::Invalid(_))));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_edit() {
        let admin = admin_view(Arc::new(MockCatalogStore::new()));
        let id = admin
            .add(fixtures::house_entry("med1", "Amoxil"))
            .await
            .unwrap();

        let mut entry = admin.entry(id).unwrap();
        entry.dosage = "500mg".to_string();
        admin.edit(entry).await.unwrap();
        assert_eq!(admin.entry(id).unwrap().dosage, "500mg");

        let mut blank = admin.entry(id).unwrap();
        blank.display_name.clear();
        assert!(matches!(
            admin.edit(blank).await,
            Err(AdminError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_active() {
        let admin = admin_view(Arc::new(MockCatalogStore::new()));
        let id = admin
            .add(fixtures::house_entry("med1", "Amoxil"))
            .await
            .unwrap();

        let toggled = admin.toggle_active(id).await.unwrap();
        assert!(!toggled.is_active);
        assert!(!admin.entry(id).unwrap().is_active);

        admin.toggle_active(id).await.unwrap();
        assert!(admin.entry(id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_toggle_preferred_locked_for_house() {
        let store = Arc::new(MockCatalogStore::new());
        let admin = admin_view(store.clone());
        let id = admin
            .add(fixtures::house_entry("med1", "Amoxil"))
            .await
            .unwrap();
        let writes = store.write_count();

        let result = admin.toggle_preferred_affiliate(id).await;
        assert!(matches!(result, Err(AdminError::HousePreferenceLocked)));
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_toggle_preferred_for_affiliate() {
        let admin = admin_view(Arc::new(MockCatalogStore::new()));
        let id = admin
            .add(fixtures::affiliate_entry("med2", "Generic X", "Acme", false))
            .await
            .unwrap();

        let toggled = admin.toggle_preferred_affiliate(id).await.unwrap();
        assert!(toggled.is_preferred_affiliate);
        assert!(admin.entry(id).unwrap().is_preferred_affiliate);
    }

    #[tokio::test]
    async fn test_delete_and_missing_id() {
        let admin = admin_view(Arc::new(MockCatalogStore::new()));
        let id = admin
            .add(fixtures::house_entry("med1", "Amoxil"))
            .await
            .unwrap();

        admin.delete(id).await.unwrap();
        assert!(admin.entries().is_empty());

        let result = admin.delete(id).await;
        assert!(matches!(
            result,
            Err(AdminError::Command(CommandError::Store(StoreError::NotFound(_))))
        ));
    }

    #[tokio::test]
    async fn test_import_outcome() {
        let admin = admin_view(Arc::new(MockCatalogStore::new()));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(fixtures::SAMPLE_IMPORT_JSON.as_bytes())
            .unwrap();

        let outcome = admin.import_outcome(file.path()).await;
        assert_eq!(outcome.error, None);
        assert_eq!(outcome.imported, admin.entries().len());

        let outcome = admin.import_outcome("/non/existent/file.json").await;
        assert_eq!(outcome.imported, 0);
        assert!(outcome.error.is_some());
    }
}

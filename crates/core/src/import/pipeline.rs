//! Full-replacement import of a JSON file into the catalog.

use std::path::Path;

use chrono::Utc;

use super::{parse_document, ImportError, ImportOutcome, ImportReport};
use crate::catalog::CatalogEntry;
use crate::repository::CatalogRepository;

/// Converts an import file into catalog entries and swaps the dataset.
#[derive(Clone)]
pub struct ImportPipeline {
    repository: CatalogRepository,
    house_source: String,
}

impl ImportPipeline {
    pub fn new(repository: CatalogRepository, house_source: impl Into<String>) -> Self {
        Self {
            repository,
            house_source: house_source.into(),
        }
    }

    /// Read and convert the file without touching the store.
    ///
    /// Returns the converted entries and the number of skipped elements.
    pub fn load_file(&self, path: &Path) -> Result<(Vec<CatalogEntry>, usize), ImportError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ImportError::ParseFailure(format!("cannot read {}: {}", path.display(), e))
        })?;

        let parsed = parse_document(&text)?;
        let entries = parsed
            .descriptors
            .into_iter()
            .map(|d| d.into_entry(&self.house_source))
            .collect();

        Ok((entries, parsed.skipped))
    }

    /// Replace the whole catalog with the contents of `path`.
    ///
    /// On any error the existing dataset is left as it was. This call blocks
    /// on file and database I/O.
    pub fn import_file(&self, path: &Path) -> Result<ImportReport, ImportError> {
        tracing::info!(path = %path.display(), "Starting catalog import");

        let (entries, skipped) = self.load_file(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Import file rejected");
        })?;

        if entries.is_empty() {
            tracing::warn!(path = %path.display(), skipped, "Import file has no usable entries");
            return Err(ImportError::EmptyDataset);
        }

        let imported = self.repository.replace_all(&entries).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to store imported entries");
            ImportError::StorageFailure(e)
        })?;

        tracing::info!(imported, skipped, "Catalog import completed");

        Ok(ImportReport {
            imported,
            skipped,
            completed_at: Utc::now(),
        })
    }

    /// Run an import and report through a `(count, reason)` callback.
    ///
    /// Success calls `on_complete(imported, None)`; any failure calls
    /// `on_complete(0, Some(reason))`.
    pub fn import_with_callback<F>(&self, path: &Path, on_complete: F)
    where
        F: FnOnce(usize, Option<String>),
    {
        let outcome = ImportOutcome::from(self.import_file(path));
        on_complete(outcome.imported, outcome.error);
    }
}

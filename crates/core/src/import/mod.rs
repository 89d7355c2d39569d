//! Bulk JSON import.
//!
//! An import always replaces the entire catalog. Files are parsed element by
//! element, house-sourced entries are marked preferred, and the store swap
//! happens in a single transaction.

mod descriptor;
mod pipeline;

pub use descriptor::{parse_document, EntryDescriptor, ParsedDocument};
pub use pipeline::ImportPipeline;

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::StoreError;

/// Errors that abort an import. The store is unchanged in every case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to parse import file: {0}")]
    ParseFailure(String),

    #[error("No usable entries found in the import file")]
    EmptyDataset,

    #[error("Failed to store imported entries: {0}")]
    StorageFailure(StoreError),
}

/// Summary of a successful import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// Entries now in the catalog.
    pub imported: usize,
    /// Array elements dropped during parsing.
    pub skipped: usize,
    pub completed_at: DateTime<Utc>,
}

/// Flattened `(count, reason)` form of an import result.
///
/// `imported` is 0 whenever `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub error: Option<String>,
}

impl From<Result<ImportReport, ImportError>> for ImportOutcome {
    fn from(result: Result<ImportReport, ImportError>) -> Self {
        match result {
            Ok(report) => Self {
                imported: report.imported,
                error: None,
            },
            Err(e) => Self {
                imported: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Resolve a client-supplied import file name inside `dir`.
///
/// Only plain relative paths are accepted. Absolute paths, `..`, `.` and
/// hidden components are rejected.
pub fn resolve_import_path(dir: &Path, requested: &Path) -> Option<PathBuf> {
    let mut components = requested.components().peekable();
    components.peek()?;

    let mut resolved = dir.to_path_buf();
    for component in components {
        match component {
            Component::Normal(part) if !part.to_string_lossy().starts_with('.') => {
                resolved.push(part)
            }
            _ => return None,
        }
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_import_path_inside_dir() {
        let dir = Path::new("/srv/imports");
        assert_eq!(
            resolve_import_path(dir, Path::new("catalog.json")),
            Some(PathBuf::from("/srv/imports/catalog.json"))
        );
        assert_eq!(
            resolve_import_path(dir, Path::new("2024/catalog.json")),
            Some(PathBuf::from("/srv/imports/2024/catalog.json"))
        );
    }

    #[test]
    fn test_resolve_import_path_rejects_escapes() {
        let dir = Path::new("/srv/imports");
        assert_eq!(resolve_import_path(dir, Path::new("/etc/passwd")), None);
        assert_eq!(resolve_import_path(dir, Path::new("../secret.json")), None);
        assert_eq!(resolve_import_path(dir, Path::new("a/../../b.json")), None);
        assert_eq!(resolve_import_path(dir, Path::new(".hidden.json")), None);
        assert_eq!(resolve_import_path(dir, Path::new("")), None);
    }

    #[test]
    fn test_outcome_from_success() {
        let outcome = ImportOutcome::from(Ok(ImportReport {
            imported: 3,
            skipped: 1,
            completed_at: Utc::now(),
        }));
        assert_eq!(
            outcome,
            ImportOutcome {
                imported: 3,
                error: None
            }
        );
    }

    #[test]
    fn test_outcome_from_failure_has_zero_count() {
        let outcome = ImportOutcome::from(Err(ImportError::StorageFailure(StoreError::Database(
            "disk full".to_string(),
        ))));
        assert_eq!(outcome.imported, 0);
        assert_eq!(
            outcome.error.as_deref(),
            Some("Failed to store imported entries: Database error: disk full")
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ImportOutcome {
            imported: 0,
            error: Some("No usable entries found in the import file".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["imported"], 0);
        assert_eq!(json["error"], "No usable entries found in the import file");
    }
}

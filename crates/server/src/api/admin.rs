//! Admin API handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use biocatalog_core::{
    is_preferred, resolve_import_path, AdminError, CatalogEntry, CommandError, ImportError,
    ImportOutcome,
};
use serde::{Deserialize, Serialize};

use super::handlers::{admin_error, api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Request body for creating or replacing an entry
#[derive(Debug, Deserialize)]
pub struct EntryBody {
    pub external_id: String,
    pub display_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Defaults to the configured house source
    pub source: Option<String>,
    #[serde(default)]
    pub is_preferred_affiliate: bool,
    #[serde(default)]
    pub active_ingredient: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub common_side_effects: Vec<String>,
    #[serde(default)]
    pub indicated_in: Vec<String>,
    #[serde(default)]
    pub drug_interactions: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl EntryBody {
    /// House entries are always stored as preferred.
    fn into_entry(self, id: i64, house_source: &str) -> CatalogEntry {
        let source = self
            .source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| house_source.to_string());
        CatalogEntry {
            id,
            external_id: self.external_id,
            display_name: self.display_name,
            is_active: self.is_active,
            is_preferred_affiliate: is_preferred(
                &source,
                self.is_preferred_affiliate,
                house_source,
            ),
            source,
            active_ingredient: self.active_ingredient,
            category: self.category,
            dosage: self.dosage,
            form: self.form,
            price: self.price,
            description: self.description,
            key_features: self.key_features,
            common_side_effects: self.common_side_effects,
            indicated_in: self.indicated_in,
            drug_interactions: self.drug_interactions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminListResponse {
    pub entries: Vec<AdminEntryResponse>,
    pub total: usize,
}

/// Entry plus the admin-only derived fields
#[derive(Debug, Serialize)]
pub struct AdminEntryResponse {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// False for house entries, whose preference is fixed
    pub can_toggle_preferred: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportBody {
    /// File path relative to the configured import directory
    pub path: PathBuf,
}

// ============================================================================
// Handlers
// ============================================================================

fn entry_response(state: &AppState, entry: CatalogEntry) -> AdminEntryResponse {
    AdminEntryResponse {
        can_toggle_preferred: state.admin().can_toggle_preferred(&entry),
        entry,
    }
}

/// GET /api/v1/admin/entries
///
/// Every entry, including inactive ones.
pub async fn list_entries(State(state): State<Arc<AppState>>) -> Json<AdminListResponse> {
    let entries: Vec<AdminEntryResponse> = state
        .admin()
        .entries()
        .iter()
        .cloned()
        .map(|e| entry_response(&state, e))
        .collect();
    Json(AdminListResponse {
        total: entries.len(),
        entries,
    })
}

/// GET /api/v1/admin/entries/{id}
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AdminEntryResponse>, ApiError> {
    match state.admin().entry(id) {
        Some(entry) => Ok(Json(entry_response(&state, entry))),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Entry not found: {}", id),
        )),
    }
}

/// POST /api/v1/admin/entries
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EntryBody>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let entry = body.into_entry(0, &state.config().catalog.house_source);
    let id = state.admin().add(entry).await.map_err(admin_error)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /api/v1/admin/entries/{id}
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<EntryBody>,
) -> Result<Json<AdminEntryResponse>, ApiError> {
    let entry = body.into_entry(id, &state.config().catalog.house_source);
    state.admin().edit(entry.clone()).await.map_err(admin_error)?;
    Ok(Json(entry_response(&state, entry)))
}

/// DELETE /api/v1/admin/entries/{id}
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.admin().delete(id).await.map_err(admin_error)?;
    Ok(Json(SuccessResponse {
        message: format!("Deleted entry {}", id),
    }))
}

/// POST /api/v1/admin/entries/{id}/toggle-active
pub async fn toggle_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AdminEntryResponse>, ApiError> {
    let entry = state.admin().toggle_active(id).await.map_err(admin_error)?;
    Ok(Json(entry_response(&state, entry)))
}

/// POST /api/v1/admin/entries/{id}/toggle-preferred
pub async fn toggle_preferred(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AdminEntryResponse>, ApiError> {
    let entry = state
        .admin()
        .toggle_preferred_affiliate(id)
        .await
        .map_err(admin_error)?;
    Ok(Json(entry_response(&state, entry)))
}

/// POST /api/v1/admin/import
///
/// Replace the catalog from a JSON file in the import directory. The body is
/// always `{ imported, error }`.
pub async fn import_file(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ImportBody>,
) -> (StatusCode, Json<ImportOutcome>) {
    let Some(path) = resolve_import_path(&state.config().import.dir, &body.path) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ImportOutcome {
                imported: 0,
                error: Some("Import path must be relative to the import directory".to_string()),
            }),
        );
    };

    match state.admin().import_file(path).await {
        Ok(report) => (StatusCode::OK, Json(ImportOutcome::from(Ok(report)))),
        Err(AdminError::Command(CommandError::Import(e))) => {
            let status = match &e {
                ImportError::ParseFailure(_) | ImportError::EmptyDataset => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ImportError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ImportOutcome::from(Err(e))))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ImportOutcome {
                imported: 0,
                error: Some(e.to_string()),
            }),
        ),
    }
}

//! End-user catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use biocatalog_core::{BucketCounts, CatalogCard, CatalogFilter, EntryDetail};
use serde::Serialize;

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub entries: Vec<CatalogCard>,
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/catalog
///
/// Active entries, optionally narrowed to one bucket and a search query.
pub async fn list_catalog(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CatalogFilter>,
) -> Json<CatalogListResponse> {
    let entries = state.catalog().entries(&filter);
    Json(CatalogListResponse {
        total: entries.len(),
        entries,
    })
}

/// GET /api/v1/catalog/buckets
pub async fn bucket_counts(State(state): State<Arc<AppState>>) -> Json<BucketCounts> {
    Json(state.catalog().bucket_counts())
}

/// GET /api/v1/catalog/{external_id}
///
/// Detail of one active entry.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<String>,
) -> Result<Json<EntryDetail>, ApiError> {
    match state.detail().load(&external_id) {
        Some(detail) => Ok(Json(detail)),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Entry not found: {}", external_id),
        )),
    }
}

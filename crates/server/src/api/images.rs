//! Image lookup API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub file: String,
    /// Path the file is served from
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub external_id: String,
    pub files: Vec<String>,
}

/// GET /api/v1/images/{external_id}/{slot}
pub async fn resolve_image(
    State(state): State<Arc<AppState>>,
    Path((external_id, slot)): Path<(String, u8)>,
) -> Result<Json<ImageResponse>, ApiError> {
    match state.images().resolve_image(&external_id, slot) {
        Some(file) => Ok(Json(ImageResponse {
            url: format!("/images/{}", file),
            file,
        })),
        None => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("No image for {} in slot {}", external_id, slot),
        )),
    }
}

/// GET /api/v1/images/{external_id}
pub async fn gallery(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<String>,
) -> Json<GalleryResponse> {
    Json(GalleryResponse {
        files: state.images().gallery(&external_id),
        external_id,
    })
}

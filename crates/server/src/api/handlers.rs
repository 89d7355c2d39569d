use axum::{extract::State, http::StatusCode, Json};
use biocatalog_core::{AdminError, CommandError, SanitizedConfig, StoreError};
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub entries: u64,
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound(_) => api_error(StatusCode::NOT_FOUND, e.to_string()),
        _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

pub fn admin_error(e: AdminError) -> ApiError {
    match e {
        AdminError::Invalid(_) => api_error(StatusCode::BAD_REQUEST, e.to_string()),
        AdminError::HousePreferenceLocked => api_error(StatusCode::CONFLICT, e.to_string()),
        AdminError::Command(CommandError::Store(store)) => store_error(store),
        AdminError::Command(_) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        entries: state.admin().entries().len() as u64,
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{admin, catalog, cors, handlers, images, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let image_dir = state.config().images.dir.clone();
    let cors = cors::cors_layer(&state.config().server);

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // End-user catalog
        .route("/catalog", get(catalog::list_catalog))
        .route("/catalog/buckets", get(catalog::bucket_counts))
        .route("/catalog/live", get(ws::ws_handler))
        .route("/catalog/{external_id}", get(catalog::get_entry))
        // Images
        .route("/images/{external_id}", get(images::gallery))
        .route("/images/{external_id}/{slot}", get(images::resolve_image))
        // Admin
        .route(
            "/admin/entries",
            get(admin::list_entries).post(admin::create_entry),
        )
        .route(
            "/admin/entries/{id}",
            get(admin::get_entry)
                .put(admin::update_entry)
                .delete(admin::delete_entry),
        )
        .route(
            "/admin/entries/{id}/toggle-active",
            post(admin::toggle_active),
        )
        .route(
            "/admin/entries/{id}/toggle-preferred",
            post(admin::toggle_preferred),
        )
        .route("/admin/import", post(admin::import_file))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest_service("/images", ServeDir::new(image_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use biocatalog_core::config::ServerConfig;

/// CORS layer from `server.cors_allowed_origins`. No usable origin means any.
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

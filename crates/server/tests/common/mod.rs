//! Common test utilities for E2E testing.
//!
//! This module provides a test fixture that creates an in-process server
//! over an in-memory catalog store, enabling E2E testing of every endpoint
//! without a database file or a listening socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use biocatalog_core::{
    config::{ImagesConfig, ImportConfig},
    create_command_queue,
    testing::MockCatalogStore,
    CatalogRepository, Config, ImportPipeline,
};
use biocatalog_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use biocatalog_core::testing::fixtures;

/// Test fixture for E2E testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_entry() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/admin/entries", json!({
///         "external_id": "med1",
///         "display_name": "Amoxil"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Store behind the router - inspect contents or inject failures
    pub store: Arc<MockCatalogStore>,
    pub repository: CatalogRepository,
    /// Temporary directory for images; also the import directory
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty catalog.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let image_dir = temp_dir.path().join("images");
        std::fs::create_dir_all(&image_dir).expect("Failed to create image dir");

        let config = Config {
            images: ImagesConfig {
                dir: image_dir,
                ..Default::default()
            },
            import: ImportConfig {
                dir: temp_dir.path().to_path_buf(),
            },
            ..Default::default()
        };

        let store = Arc::new(MockCatalogStore::new());
        let repository = CatalogRepository::new(store.clone());
        let import = ImportPipeline::new(repository.clone(), config.catalog.house_source.clone());
        let (commands, worker) = create_command_queue(repository.clone(), import, 16);

        // Spawn command worker
        tokio::spawn(worker.run());

        let state = Arc::new(AppState::new(config, repository.clone(), commands));
        let router = create_router(state);

        Self {
            router,
            store,
            repository,
            temp_dir,
        }
    }

    /// Create a fixture whose catalog already holds `fixtures::mixed_catalog()`.
    pub async fn with_catalog() -> Self {
        let fixture = Self::new().await;
        fixture
            .repository
            .insert_many(&fixtures::mixed_catalog())
            .expect("Failed to seed catalog");
        fixture
    }

    /// Write an import file into the import directory and return the name
    /// to send to the import endpoint.
    pub fn write_import(&self, name: &str, contents: &str) -> String {
        std::fs::write(self.temp_dir.path().join(name), contents)
            .expect("Failed to write import file");
        name.to_string()
    }

    /// Create an (empty) image file.
    pub fn add_image(&self, name: &str) {
        std::fs::write(self.temp_dir.path().join("images").join(name), b"")
            .expect("Failed to write image");
    }

    /// Surrogate id of the entry with this external id.
    pub fn id_of(&self, external_id: &str) -> i64 {
        self.repository
            .find_by_external_id(external_id)
            .expect("Failed to query store")
            .expect("Entry not found")
            .id
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

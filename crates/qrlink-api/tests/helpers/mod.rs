//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p qrlink-api`.

pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use qrlink_api::setup::routes;
use qrlink_api::{AppState, QrArtifactService, StorageHandle};
use qrlink_core::Config;
use qrlink_processing::QrRenderOptions;
use qrlink_storage::{GcsStorage, Storage};
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_BUCKET: &str = "my_generated_qrs";

/// Test application: server plus the storage it uploads into.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<dyn Storage>,
    pub state: Arc<AppState>,
    /// Set when the app runs on the in-memory bucket.
    pub bucket: Option<Arc<GcsStorage>>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Object names the in-memory bucket actually holds, sorted.
    pub async fn stored_keys(&self) -> Vec<String> {
        let bucket = self
            .bucket
            .as_ref()
            .expect("stored_keys requires the in-memory bucket");
        let mut keys = bucket.list_keys().await.expect("Failed to list bucket");
        keys.sort();
        keys
    }
}

/// Configuration for tests, with `overrides` applied on top of an in-memory backend.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("STORAGE_BACKEND".to_string(), "memory".to_string()),
        ("GCS_BUCKET".to_string(), TEST_BUCKET.to_string()),
        ("UPLOAD_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

/// Setup test app backed by an in-memory bucket.
pub async fn setup_test_app() -> TestApp {
    let bucket = Arc::new(GcsStorage::in_memory(TEST_BUCKET));
    let mut app = setup_test_app_with_storage(bucket.clone(), &[]).await;
    app.bucket = Some(bucket);
    app
}

/// Setup test app around an arbitrary storage implementation.
pub async fn setup_test_app_with_storage(
    storage: Arc<dyn Storage>,
    overrides: &[(&str, &str)],
) -> TestApp {
    let config = test_config(overrides);
    let options =
        QrRenderOptions::from_config(&config.qr).expect("Failed to build render options");

    let handle = StorageHandle::new(storage.clone());
    let qr = QrArtifactService::new(handle.clone(), options, config.upload_timeout());
    let state = Arc::new(AppState {
        config: config.clone(),
        storage: handle,
        qr,
    });

    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        state,
        bucket: None,
    }
}

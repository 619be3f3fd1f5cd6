//! Application state shared by all handlers.

use crate::services::qr_artifact::QrArtifactService;
use qrlink_core::{AppError, Config};
use qrlink_storage::{create_storage, Storage, StorageResult};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide handle to the storage client.
///
/// Built once during startup and cloned into every component that uploads.
/// `reconnect` swaps in a freshly built client; `teardown` releases it on
/// shutdown, after which `current` fails instead of reaching a dead client.
#[derive(Clone)]
pub struct StorageHandle {
    inner: Arc<RwLock<Option<Arc<dyn Storage>>>>,
}

impl StorageHandle {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(storage))),
        }
    }

    /// The client in use right now.
    pub async fn current(&self) -> Result<Arc<dyn Storage>, AppError> {
        self.inner
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Internal("Storage client has been released".to_string()))
    }

    /// Replace the client, returning the previous one if any.
    pub async fn replace(&self, storage: Arc<dyn Storage>) -> Option<Arc<dyn Storage>> {
        self.inner.write().await.replace(storage)
    }

    /// Build a new client from configuration and swap it in.
    ///
    /// The old client keeps serving requests that already hold it.
    pub async fn reconnect(&self, config: &Config) -> StorageResult<()> {
        let storage = create_storage(config).await?;
        let backend = storage.backend_type();
        let bucket = storage.bucket().to_string();
        self.replace(storage).await;
        tracing::info!(backend = %backend, bucket = %bucket, "Storage client reconnected");
        Ok(())
    }

    /// Release the client.
    pub async fn teardown(&self) {
        if let Some(storage) = self.inner.write().await.take() {
            tracing::info!(
                backend = %storage.backend_type(),
                bucket = %storage.bucket(),
                "Storage client released"
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: StorageHandle,
    pub qr: QrArtifactService,
}

#[cfg(feature = "storage-gcs")]
use crate::GcsStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use qrlink_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-gcs")]
        StorageBackend::Gcs => {
            let storage = GcsStorage::new(
                config.bucket().to_string(),
                config.credentials_path().map(|p| p.as_path()),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-gcs")]
        StorageBackend::Memory => Ok(Arc::new(GcsStorage::in_memory(config.bucket()))),

        #[cfg(not(feature = "storage-gcs"))]
        StorageBackend::Gcs | StorageBackend::Memory => Err(StorageError::ConfigError(
            "GCS storage backend not available (storage-gcs feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

//! Storage doubles for exercising failure paths.

use async_trait::async_trait;
use qrlink_core::StorageBackend;
use qrlink_storage::{Storage, StorageError, StorageResult, StoredObject};
use std::time::Duration;

/// Storage whose every call is refused.
pub struct FailingStorage {
    pub message: String,
}

impl FailingStorage {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_with_key(
        &self,
        _storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed(self.message.clone()))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<StoredObject> {
        Err(StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Err(StorageError::BackendError(self.message.clone()))
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        Err(StorageError::BackendError(self.message.clone()))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://storage.googleapis.com/unreachable/{}", storage_key)
    }

    fn bucket(&self) -> &str {
        "unreachable"
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}

/// Storage that never finishes an upload within the test timeout.
pub struct SlowStorage {
    pub delay: Duration,
}

#[async_trait]
impl Storage for SlowStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        _data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok(self.public_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<StoredObject> {
        Err(StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(true)
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://storage.googleapis.com/slow/{}", storage_key)
    }

    fn bucket(&self) -> &str {
        "slow"
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}

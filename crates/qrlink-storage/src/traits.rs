//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A stored blob together with its declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

/// Storage abstraction trait
///
/// Every backend writes whole objects under caller-chosen keys and can tell
/// whether its bucket is reachable. Uploads to an existing key replace it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data to a specific storage key and return its public URL.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Download an object with its content type.
    async fn download(&self, storage_key: &str) -> StorageResult<StoredObject>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Check whether the configured bucket exists and is accessible.
    ///
    /// `Ok(false)` means the bucket is missing; errors mean the backend could
    /// not be asked.
    async fn bucket_exists(&self) -> StorageResult<bool>;

    /// Public URL an object at `storage_key` resolves to.
    fn public_url(&self, storage_key: &str) -> String;

    /// Bucket (or root directory) name
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

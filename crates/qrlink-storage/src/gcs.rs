use crate::keys::gcs_public_url;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::path::Path as FsPath;
use std::sync::Arc;

/// Google Cloud Storage implementation
///
/// Objects are addressed as `https://storage.googleapis.com/{bucket}/{key}`,
/// which resolves publicly once the bucket grants public read access.
#[derive(Clone)]
pub struct GcsStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
}

impl GcsStorage {
    /// Create a new GcsStorage instance
    ///
    /// # Arguments
    /// * `bucket` - GCS bucket name
    /// * `credentials_path` - Optional application default credentials file,
    ///   either a service account key or a `gcloud` authorized user file. When
    ///   absent, credentials are resolved from the `GOOGLE_*` environment
    ///   variables or the well-known ADC location.
    pub fn new(bucket: String, credentials_path: Option<&FsPath>) -> StorageResult<Self> {
        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket.clone());

        if let Some(path) = credentials_path {
            builder = builder.with_application_credentials(path.to_string_lossy());
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(GcsStorage {
            store: Arc::new(store),
            bucket,
            backend: StorageBackend::Gcs,
        })
    }

    /// In-process store that hands out the same public URLs as GCS.
    pub fn in_memory(bucket: impl Into<String>) -> Self {
        GcsStorage {
            store: Arc::new(InMemory::new()),
            bucket: bucket.into(),
            backend: StorageBackend::Memory,
        }
    }

    /// Names of every object in the bucket, as stored.
    pub async fn list_keys(&self) -> StorageResult<Vec<String>> {
        self.store
            .list(None)
            .map_ok(|meta| meta.location.to_string())
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// Object location for `storage_key`, kept byte-for-byte.
///
/// Keys that object_store would normalize or escape (empty, `.` or `..`
/// segments, control characters, surrounding `/`) are refused.
fn object_location(storage_key: &str) -> StorageResult<Path> {
    let location = Path::parse(storage_key)
        .map_err(|e| StorageError::InvalidKey(format!("{}: {}", storage_key, e)))?;
    if location.to_string() != storage_key {
        return Err(StorageError::InvalidKey(format!(
            "{} cannot be stored verbatim",
            storage_key
        )));
    }
    Ok(location)
}

#[async_trait]
impl Storage for GcsStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let size = data.len() as u64;
        let location = object_location(storage_key)?;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let mut opts = PutOptions::default();
        opts.attributes = attributes;

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "GCS upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.public_url(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "GCS upload successful"
        );

        Ok(url)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<StoredObject> {
        let start = std::time::Instant::now();
        let location = object_location(storage_key)?;

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "GCS download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string());

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "GCS download successful"
        );

        Ok(StoredObject {
            data: bytes.to_vec(),
            content_type,
        })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let location = object_location(storage_key)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        match self.store.list_with_delimiter(None).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        gcs_public_url(&self.bucket, storage_key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_sets_content_type_and_url() {
        let storage = GcsStorage::in_memory("my_generated_qrs");

        let url = storage
            .upload_with_key("qr_codes/example.com/page.png", b"png".to_vec(), "image/png")
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://storage.googleapis.com/my_generated_qrs/qr_codes/example.com/page.png"
        );

        let object = storage.download("qr_codes/example.com/page.png").await.unwrap();
        assert_eq!(object.data, b"png".to_vec());
        assert_eq!(object.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_upload_overwrites_existing_key() {
        let storage = GcsStorage::in_memory("bucket");

        let first = storage
            .upload_with_key("qr_codes/a.png", b"one".to_vec(), "image/png")
            .await
            .unwrap();
        let second = storage
            .upload_with_key("qr_codes/a.png", b"two".to_vec(), "image/png")
            .await
            .unwrap();

        assert_eq!(first, second);
        let object = storage.download("qr_codes/a.png").await.unwrap();
        assert_eq!(object.data, b"two".to_vec());
    }

    #[tokio::test]
    async fn test_exists_and_missing_download() {
        let storage = GcsStorage::in_memory("bucket");
        assert!(!storage.exists("qr_codes/missing.png").await.unwrap());

        let result = storage.download("qr_codes/missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));

        storage
            .upload_with_key("qr_codes/present.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert!(storage.exists("qr_codes/present.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_stored_verbatim() {
        let storage = GcsStorage::in_memory("bucket");
        let keys = [
            "qr_codes/localhost:3000/path?query=1#frag.png",
            "qr_codes/example.com/*/[a]%20b.png",
            "qr_codes/example.com/a b.png",
        ];

        for key in keys {
            let url = storage
                .upload_with_key(key, b"png".to_vec(), "image/png")
                .await
                .unwrap();
            assert_eq!(url, format!("https://storage.googleapis.com/bucket/{}", key));
        }

        let mut stored = storage.list_keys().await.unwrap();
        stored.sort();
        let mut expected: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        expected.sort();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_keys_that_would_be_renamed_are_rejected() {
        let storage = GcsStorage::in_memory("bucket");

        for key in [
            "qr_codes/example.com/./page.png",
            "qr_codes/example.com/../page.png",
            "qr_codes//page.png",
            "/qr_codes/page.png",
            "qr_codes/line\nbreak.png",
        ] {
            let result = storage
                .upload_with_key(key, b"png".to_vec(), "image/png")
                .await;
            assert!(
                matches!(result, Err(StorageError::InvalidKey(_))),
                "{} was accepted",
                key
            );
        }
        assert!(storage.list_keys().await.unwrap().is_empty());
    }

    #[test]
    fn test_authorized_user_credentials_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("application_default_credentials.json");
        std::fs::write(
            &path,
            r#"{"type":"authorized_user","client_id":"id","client_secret":"secret","refresh_token":"token"}"#,
        )
        .unwrap();

        let storage = GcsStorage::new("bucket".to_string(), Some(&path)).unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Gcs);
    }

    #[test]
    fn test_unreadable_credentials_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let result = GcsStorage::new("bucket".to_string(), Some(&path));
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_in_memory_bucket_is_reachable() {
        let storage = GcsStorage::in_memory("bucket");
        assert!(storage.bucket_exists().await.unwrap());
        assert_eq!(storage.bucket(), "bucket");
        assert_eq!(storage.backend_type(), StorageBackend::Memory);
    }
}

use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Suffix of the sidecar file recording an object's content type.
const CONTENT_TYPE_SUFFIX: &str = ".content-type";

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    name: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/qrlink")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        let name = base_path.display().to_string();

        Ok(LocalStorage {
            base_path,
            base_url,
            name,
        })
    }

    /// Convert storage key to filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        let bad_segment = storage_key.split('/').any(|segment| {
            segment.is_empty()
                || segment == "."
                || segment == ".."
                || segment.contains('\\')
                || segment.chars().any(|c| c.is_ascii_control())
        });
        if bad_segment || storage_key.ends_with(CONTENT_TYPE_SUFFIX) {
            return Err(StorageError::InvalidKey(format!(
                "Storage key is not allowed: {}",
                storage_key
            )));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn sidecar_path(path: &Path) -> PathBuf {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(CONTENT_TYPE_SUFFIX);
        PathBuf::from(sidecar)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        fs::write(Self::sidecar_path(&path), content_type)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to record content type for {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let url = self.public_url(storage_key);

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn download(&self, storage_key: &str) -> StorageResult<StoredObject> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        let content_type = fs::read_to_string(Self::sidecar_path(&path)).await.ok();

        Ok(StoredObject { data, content_type })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        match fs::metadata(&self.base_path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn bucket(&self) -> &str {
        &self.name
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_upload_download() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8000/media/".to_string())
            .await
            .unwrap();

        let url = storage
            .upload_with_key("qr_codes/example.com/page.png", b"png".to_vec(), "image/png")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:8000/media/qr_codes/example.com/page.png");

        let object = storage
            .download("qr_codes/example.com/page.png")
            .await
            .unwrap();
        assert_eq!(object.data, b"png".to_vec());
        assert_eq!(object.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8000/media".to_string())
            .await
            .unwrap();

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .upload_with_key("/etc/passwd", vec![0], "image/png")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("qr_codes/a.png.content-type").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        for key in ["qr_codes/./a.png", "qr_codes//a.png", "qr_codes\\..\\a.png"] {
            let result = storage.upload_with_key(key, vec![0], "image/png").await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{}", key);
        }
    }

    #[tokio::test]
    async fn test_query_characters_are_kept_in_file_name() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8000/media".to_string())
            .await
            .unwrap();

        let key = "qr_codes/example.com/a..b?q=1*.png";
        storage
            .upload_with_key(key, b"png".to_vec(), "image/png")
            .await
            .unwrap();
        assert!(dir.path().join(key).is_file());
    }

    #[tokio::test]
    async fn test_local_storage_exists_and_overwrite() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8000/media".to_string())
            .await
            .unwrap();

        assert!(!storage.exists("qr_codes/a.png").await.unwrap());
        storage
            .upload_with_key("qr_codes/a.png", b"one".to_vec(), "image/png")
            .await
            .unwrap();
        storage
            .upload_with_key("qr_codes/a.png", b"two".to_vec(), "image/png")
            .await
            .unwrap();
        assert!(storage.exists("qr_codes/a.png").await.unwrap());
        assert_eq!(storage.download("qr_codes/a.png").await.unwrap().data, b"two");
    }

    #[tokio::test]
    async fn test_bucket_exists_tracks_base_directory() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("store");
        let storage = LocalStorage::new(&base, "http://localhost:8000/media".to_string())
            .await
            .unwrap();
        assert!(storage.bucket_exists().await.unwrap());

        fs::remove_dir_all(&base).await.unwrap();
        assert!(!storage.bucket_exists().await.unwrap());
    }
}

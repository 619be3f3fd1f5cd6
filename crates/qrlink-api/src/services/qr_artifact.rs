//! QR artifact pipeline: encode, render, derive key, upload, return URL.

use crate::error::{qr_error, storage_error};
use crate::state::StorageHandle;
use qrlink_core::constants::PNG_CONTENT_TYPE;
use qrlink_core::models::ConnectivityReport;
use qrlink_core::AppError;
use qrlink_processing::{generate_png, QrRenderOptions};
use qrlink_storage::derive_object_key;
use std::time::{Duration, Instant};

/// Location of an uploaded QR image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub key: String,
    pub url: String,
}

/// Generates QR images and publishes them to the configured bucket.
///
/// Holds no per-request state; concurrent calls share only the storage handle.
#[derive(Clone)]
pub struct QrArtifactService {
    storage: StorageHandle,
    options: QrRenderOptions,
    upload_timeout: Duration,
}

impl QrArtifactService {
    pub fn new(storage: StorageHandle, options: QrRenderOptions, upload_timeout: Duration) -> Self {
        Self {
            storage,
            options,
            upload_timeout,
        }
    }

    pub fn options(&self) -> &QrRenderOptions {
        &self.options
    }

    /// Render `url` as a PNG QR code, upload it and return its public address.
    ///
    /// One upload attempt is made, bounded by the upload timeout. An object
    /// already stored under the same key is overwritten.
    #[tracing::instrument(skip(self), fields(operation = "generate_qr"))]
    pub async fn generate(&self, url: &str) -> Result<ArtifactReference, AppError> {
        if url.is_empty() {
            return Err(AppError::InvalidInput("url must not be empty".to_string()));
        }

        let start = Instant::now();
        let data = url.to_string();
        let options = self.options;
        let png = tokio::task::spawn_blocking(move || generate_png(&data, &options))
            .await
            .map_err(|e| AppError::Internal(format!("QR rendering task failed: {}", e)))?
            .map_err(qr_error)?;

        let key = derive_object_key(url);
        let storage = self.storage.current().await?;
        let size = png.len();

        let uploaded = tokio::time::timeout(
            self.upload_timeout,
            storage.upload_with_key(&key, png, PNG_CONTENT_TYPE),
        )
        .await;

        let public_url = match uploaded {
            Ok(Ok(public_url)) => public_url,
            Ok(Err(e)) => {
                tracing::error!(error = %e, key = %key, "QR Code Generation Failed");
                return Err(storage_error(e));
            }
            Err(_) => {
                tracing::error!(
                    key = %key,
                    timeout_secs = self.upload_timeout.as_secs(),
                    "QR Code Generation Failed: upload timed out"
                );
                return Err(AppError::StorageTimeout {
                    seconds: self.upload_timeout.as_secs(),
                });
            }
        };

        tracing::info!(
            key = %key,
            url = %public_url,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "QR code generated"
        );

        Ok(ArtifactReference {
            key,
            url: public_url,
        })
    }

    /// Report whether the configured bucket exists and is reachable.
    ///
    /// Never fails; problems are logged and reflected in the report.
    pub async fn check_storage_connectivity(&self) -> ConnectivityReport {
        let storage = match self.storage.current().await {
            Ok(storage) => storage,
            Err(e) => {
                tracing::warn!(error = %e, "Storage connectivity check skipped");
                return ConnectivityReport {
                    bucket: String::new(),
                    backend: "none".to_string(),
                    exists: false,
                    error: Some(e.to_string()),
                };
            }
        };

        let bucket = storage.bucket().to_string();
        let backend = storage.backend_type().to_string();

        let (exists, error) =
            match tokio::time::timeout(self.upload_timeout, storage.bucket_exists()).await {
                Ok(Ok(true)) => {
                    tracing::info!(bucket = %bucket, "Successfully connected to bucket");
                    (true, None)
                }
                Ok(Ok(false)) => {
                    tracing::warn!(bucket = %bucket, "Bucket does not exist or is not accessible");
                    (false, None)
                }
                Ok(Err(e)) => {
                    tracing::warn!(bucket = %bucket, error = %e, "Bucket is not accessible");
                    (false, Some(e.to_string()))
                }
                Err(_) => {
                    tracing::warn!(bucket = %bucket, "Bucket connectivity check timed out");
                    (false, Some("timeout".to_string()))
                }
            };

        ConnectivityReport {
            bucket,
            backend,
            exists,
            error,
        }
    }
}

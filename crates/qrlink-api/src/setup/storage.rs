//! Storage setup and initialization

use anyhow::{Context, Result};
use qrlink_core::Config;
use qrlink_storage::create_storage;

use crate::state::StorageHandle;

/// Build the process-wide storage client.
pub async fn setup_storage(config: &Config) -> Result<StorageHandle> {
    tracing::info!(
        backend = %config.storage_backend(),
        bucket = %config.bucket(),
        "Initializing storage client..."
    );

    let storage = create_storage(config)
        .await
        .context("Failed to create storage client")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %storage.bucket(),
        "Storage client initialized successfully"
    );

    Ok(StorageHandle::new(storage))
}

//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::services::qr_artifact::QrArtifactService;
use crate::state::AppState;
use anyhow::{Context, Result};
use qrlink_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    let options = validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        project_id = ?config.gcp_project_id(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;

    let qr = QrArtifactService::new(storage.clone(), options, config.upload_timeout());
    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        qr,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

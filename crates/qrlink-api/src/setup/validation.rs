//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use qrlink_core::Config;
use qrlink_processing::QrRenderOptions;

/// Validate configuration and derive the QR render options from it.
pub fn validate_config(config: &Config) -> Result<QrRenderOptions> {
    config.validate()?;

    let options = QrRenderOptions::from_config(&config.qr)?;

    if let Some(path) = config.credentials_path() {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "GOOGLE_APPLICATION_CREDENTIALS points to a missing file: {}",
                path.display()
            ));
        }
    }

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
    }

    Ok(options)
}

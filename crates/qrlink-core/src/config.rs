//! Configuration module
//!
//! This module provides the configuration structures for the API: server and
//! CORS settings, the storage backend with its credentials, and the fixed QR
//! rendering parameters.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::DEFAULT_BUCKET;
use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 8000;
const QR_BOX_SIZE: u32 = 10;
const QR_BORDER: u32 = 4;
const QR_MIN_VERSION: i16 = 1;
const UPLOAD_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
    pub http_concurrency_limit: usize,
}

/// Storage backend configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    /// Informational only; object requests are addressed by bucket.
    pub gcp_project_id: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub upload_timeout: Duration,
}

/// QR rendering configuration
#[derive(Clone, Debug)]
pub struct QrConfig {
    pub box_size: u32,
    pub border: u32,
    pub min_version: i16,
    /// One of `L`, `M`, `Q`, `H` (parsed by the processing crate)
    pub error_correction: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub storage: StorageConfig,
    pub qr: QrConfig,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: parse_or(var("SERVER_PORT"), "SERVER_PORT", SERVER_PORT)?,
            cors_origins,
            environment,
            log_format: var("LOG_FORMAT").unwrap_or_else(|| "compact".to_string()),
            http_concurrency_limit: parse_or(
                var("HTTP_CONCURRENCY_LIMIT"),
                "HTTP_CONCURRENCY_LIMIT",
                HTTP_CONCURRENCY_LIMIT,
            )?,
        };

        let backend = match var("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::Gcs,
        };

        let storage = StorageConfig {
            backend,
            bucket: var("GCS_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            gcp_project_id: var("GCP_PROJECT_ID"),
            credentials_path: var("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            upload_timeout: Duration::from_secs(parse_or(
                var("UPLOAD_TIMEOUT_SECS"),
                "UPLOAD_TIMEOUT_SECS",
                UPLOAD_TIMEOUT_SECS,
            )?),
        };

        let qr = QrConfig {
            box_size: parse_or(var("QR_BOX_SIZE"), "QR_BOX_SIZE", QR_BOX_SIZE)?,
            border: parse_or(var("QR_BORDER"), "QR_BORDER", QR_BORDER)?,
            min_version: parse_or(var("QR_MIN_VERSION"), "QR_MIN_VERSION", QR_MIN_VERSION)?,
            error_correction: var("QR_ERROR_CORRECTION").unwrap_or_else(|| "L".to_string()),
        };

        Ok(Config { base, storage, qr })
    }

    /// Reject configurations that cannot serve requests.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.storage.bucket.is_empty() {
            return Err(anyhow::anyhow!("GCS_BUCKET cannot be empty"));
        }

        if self.storage.upload_timeout.is_zero() {
            return Err(anyhow::anyhow!("UPLOAD_TIMEOUT_SECS must be greater than 0"));
        }

        if self.storage.backend == StorageBackend::Local
            && (self.storage.local_storage_path.is_none()
                || self.storage.local_storage_base_url.is_none())
        {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when using the local storage backend"
            ));
        }

        if self.qr.box_size == 0 {
            return Err(anyhow::anyhow!("QR_BOX_SIZE must be at least 1"));
        }

        if !(1..=40).contains(&self.qr.min_version) {
            return Err(anyhow::anyhow!("QR_MIN_VERSION must be between 1 and 40"));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be at least 1"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.base.log_format
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.base.http_concurrency_limit
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn bucket(&self) -> &str {
        &self.storage.bucket
    }

    pub fn gcp_project_id(&self) -> Option<&str> {
        self.storage.gcp_project_id.as_deref()
    }

    pub fn credentials_path(&self) -> Option<&PathBuf> {
        self.storage.credentials_path.as_ref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.storage.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.storage.local_storage_base_url.as_deref()
    }

    pub fn upload_timeout(&self) -> Duration {
        self.storage.upload_timeout
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: '{}' ({})", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port(), 8000);
        assert_eq!(config.cors_origins(), &["*".to_string()]);
        assert_eq!(config.storage_backend(), StorageBackend::Gcs);
        assert_eq!(config.bucket(), "my_generated_qrs");
        assert_eq!(config.qr.box_size, 10);
        assert_eq!(config.qr.border, 4);
        assert_eq!(config.qr.min_version, 1);
        assert_eq!(config.qr.error_correction, "L");
        assert_eq!(config.upload_timeout(), Duration::from_secs(30));
        assert!(!config.is_production());
    }

    #[test]
    fn test_gcs_project_id_is_optional() {
        let config = config_from(&[]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.gcp_project_id(), None);

        let config = config_from(&[("GCP_PROJECT_ID", "demo-project")]).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.gcp_project_id(), Some("demo-project"));
    }

    #[test]
    fn test_local_backend_requires_path_and_url() {
        let config = config_from(&[("STORAGE_BACKEND", "local")]).unwrap();
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("STORAGE_BACKEND", "local"),
            ("LOCAL_STORAGE_PATH", "/tmp/qrlink"),
            ("LOCAL_STORAGE_BASE_URL", "http://localhost:8000/media"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let config = config_from(&[("ENVIRONMENT", "production"), ("STORAGE_BACKEND", "memory")])
            .unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());

        let config = config_from(&[
            ("ENVIRONMENT", "production"),
            ("STORAGE_BACKEND", "memory"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();
        assert_eq!(config.cors_origins().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_numbers_are_reported() {
        let err = config_from(&[("QR_BOX_SIZE", "ten")]).unwrap_err();
        assert!(err.to_string().contains("QR_BOX_SIZE"));

        let config = config_from(&[("STORAGE_BACKEND", "memory"), ("QR_MIN_VERSION", "41")])
            .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("GCS_BUCKET", "  "), ("SERVER_PORT", "")]).unwrap();
        assert_eq!(config.bucket(), "my_generated_qrs");
        assert_eq!(config.server_port(), 8000);
    }
}

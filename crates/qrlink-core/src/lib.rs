//! qrlink Core Library
//!
//! This crate provides the shared configuration, error types, storage backend
//! selector and request/response models used by every qrlink component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, QrConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;

//! qrlink Storage Library
//!
//! This crate provides the storage abstraction for generated QR artifacts and
//! its implementations for Google Cloud Storage (plus an in-memory store with
//! the same URL layout) and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are derived from the encoded URL: `qr_codes/{url without scheme}.png`.
//! See [`keys::derive_object_key`]. Two requests for the same URL map to the
//! same key, and the later upload overwrites the earlier one.

pub mod factory;
#[cfg(feature = "storage-gcs")]
pub mod gcs;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-gcs")]
pub use gcs::GcsStorage;
pub use keys::{derive_object_key, gcs_public_url};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use qrlink_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};

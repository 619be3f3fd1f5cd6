//! qrlink API Library
//!
//! This crate provides the HTTP handlers, the QR artifact service and the
//! application setup.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use services::qr_artifact::QrArtifactService;
pub use state::{AppState, StorageHandle};

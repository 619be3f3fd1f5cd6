//! Request-scoped business logic.

pub mod qr_artifact;

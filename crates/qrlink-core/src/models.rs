//! Request and response models exposed over HTTP.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /generate-qr/`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QrRequest {
    /// Text encoded into the QR symbol. Not validated as a URL.
    pub url: String,
}

/// Public address of an uploaded QR artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QrCodeResponse {
    pub qr_code_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub item_id: i64,
    pub q: Option<String>,
}

/// Outcome of the bucket connectivity probe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectivityReport {
    pub bucket: String,
    pub backend: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//! QR generation and storage diagnostic endpoints.

use std::sync::Arc;

use axum::{extract::State, Json};
use qrlink_core::models::{ConnectivityReport, QrCodeResponse, QrRequest};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Generate QR code handler
///
/// Encodes `url` as a PNG QR code, uploads it under
/// `qr_codes/{url without scheme}.png` and returns the object's public URL.
///
/// # Errors
/// - `AppError::InvalidInput` - empty `url` or malformed body (400)
/// - `AppError::QrEncoding` - `url` does not fit in a QR symbol (422)
/// - `AppError::Storage` - upload rejected by the backend (500)
/// - `AppError::StorageTimeout` - upload did not finish in time (504)
#[utoipa::path(
    post,
    path = "/generate-qr/",
    tag = "qr",
    request_body = QrRequest,
    responses(
        (status = 200, description = "QR code uploaded", body = QrCodeResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 422, description = "Input cannot be encoded", body = ErrorResponse),
        (status = 500, description = "Generation or upload failed", body = ErrorResponse),
        (status = 504, description = "Upload timed out", body = ErrorResponse)
    )
)]
pub async fn generate_qr(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<QrRequest>,
) -> Result<Json<QrCodeResponse>, HttpAppError> {
    let reference = state.qr.generate(&request.url).await?;
    Ok(Json(QrCodeResponse {
        qr_code_url: reference.url,
    }))
}

/// Bucket connectivity probe. Always answers 200; the body says whether the
/// bucket is reachable.
#[utoipa::path(
    get,
    path = "/test",
    tag = "qr",
    responses(
        (status = 200, description = "Connectivity report", body = ConnectivityReport)
    )
)]
pub async fn test_storage_connection(
    State(state): State<Arc<AppState>>,
) -> Json<ConnectivityReport> {
    Json(state.qr.check_storage_connectivity().await)
}

//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use qrlink_core::models;

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "qrlink API",
        version = "0.1.0",
        description = "Renders URLs as PNG QR codes, stores them in a cloud bucket and returns their public links."
    ),
    paths(
        handlers::root::read_root,
        handlers::root::read_item,
        handlers::qr::generate_qr,
        handlers::qr::test_storage_connection,
    ),
    components(schemas(
        models::QrRequest,
        models::QrCodeResponse,
        models::WelcomeResponse,
        models::ItemResponse,
        models::ConnectivityReport,
        error::ErrorResponse,
    )),
    tags(
        (name = "general", description = "Welcome and demo endpoints"),
        (name = "qr", description = "QR code generation and storage diagnostics")
    )
)]
pub struct ApiDoc;

//! Route configuration and setup.

use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use qrlink_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit(),
        "HTTP concurrency limit layer enabled"
    );

    let app = api_routes()
        .merge(
            RapiDoc::with_openapi("/api/openapi.json", crate::api_doc::get_openapi_spec())
                .path("/docs"),
        )
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::root::read_root))
        .route("/items/{item_id}", get(handlers::root::read_item))
        .route("/test", get(handlers::qr::test_storage_connection))
        .route("/generate-qr/", post(handlers::qr::generate_qr))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        // Credentials cannot be combined with wildcard origins.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    };
    Ok(cors)
}

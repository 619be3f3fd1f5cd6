//! Welcome and demo item endpoints.

use axum::{
    extract::{Path, Query},
    Json,
};
use qrlink_core::models::{ItemResponse, WelcomeResponse};
use serde::Deserialize;

const WELCOME_MESSAGE: &str = "Welcome to the QR code generator API!";

#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "general",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    )
)]
pub async fn read_root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "general",
    params(
        ("item_id" = i64, Path, description = "Item identifier"),
        ("q" = Option<String>, Query, description = "Optional query string echoed back")
    ),
    responses(
        (status = 200, description = "Echoed item", body = ItemResponse)
    )
)]
pub async fn read_item(
    Path(item_id): Path<i64>,
    Query(query): Query<ItemQuery>,
) -> Json<ItemResponse> {
    Json(ItemResponse {
        item_id,
        q: query.q,
    })
}

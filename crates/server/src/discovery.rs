use axum::{
    http::header::{self, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use forno_core::discovery::{document, DISCOVERY_CACHE_CONTROL, DISCOVERY_PATH};

pub fn router() -> Router {
    Router::new().route(DISCOVERY_PATH, get(discovery))
}

/// Serves the static discovery document with a five-minute public cache window.
pub async fn discovery() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, HeaderValue::from_static(DISCOVERY_CACHE_CONTROL))],
        Json(document()),
    )
}

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use forno_core::{KeyValueStore, CART_STORAGE_KEY};
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn KeyValueStore>,
}

impl HealthState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub storage: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = storage_check(state.store.as_ref());
    let ready = storage.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "forno-server runtime initialized".to_string(),
        },
        storage,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn storage_check(store: &dyn KeyValueStore) -> HealthCheck {
    match store.get(CART_STORAGE_KEY) {
        Ok(Some(_)) => HealthCheck { status: "ready", detail: "saved cart readable".to_string() },
        Ok(None) => HealthCheck { status: "ready", detail: "no saved cart".to_string() },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("cart storage read failed: {error}") }
        }
    }
}

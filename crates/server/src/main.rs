mod discovery;
mod health;

use anyhow::Result;
use axum::Router;
use forno_core::config::{AppConfig, LoadOptions};
use forno_core::state::open_store;

fn init_logging(config: &AppConfig) {
    use forno_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

fn app(config: &AppConfig) -> Router {
    let store = open_store(&config.storage);
    Router::new()
        .merge(discovery::router())
        .merge(health::router(health::HealthState::new(store)))
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "forno.server.started",
        bind_address = %address,
        storage_backend = ?config.storage.backend,
        "forno-server listening"
    );

    axum::serve(listener, app(&config)).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(event_name = "forno.server.stopping", "forno-server stopping");
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            event_name = "forno.server.signal_error",
            error = %error,
            "could not listen for shutdown signal"
        );
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use forno_core::config::{AppConfig, StorageBackend};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::app;

    #[tokio::test]
    async fn app_serves_discovery_and_health() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Memory;
        let app = app(&config);

        let discovery = app
            .clone()
            .oneshot(Request::builder().uri("/.well-known/webmcp").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(discovery.status(), StatusCode::OK);

        let health = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(health.status(), StatusCode::OK);

        let body = to_bytes(health.into_body(), usize::MAX).await.expect("body");
        let json: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["status"], "ready");
        assert_eq!(json["service"]["status"], "ready");
    }
}

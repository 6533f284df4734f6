use std::sync::Arc;

use forno_core::config::{AppConfig, LoadOptions};
use forno_core::{open_store, Catalog, Storefront, TracingOrderSink};
use forno_mcp::{shared, ModelContext, ToolInstaller, ToolRegistry};
use serde_json::Value;

use crate::commands::CommandResult;

/// Runs one tool against the configured cart store and prints its envelope.
///
/// Configurator selections are restored from and written back to the same store, so a
/// sequence of calls behaves like one session.
///
/// Exit codes: 0 for `ok: true`, 1 for a failure envelope, 2 for configuration or
/// argument problems, 3 when the async runtime cannot start.
pub fn run(tool: &str, params: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "call",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let params = match params.map(serde_json::from_str::<Value>).transpose() {
        Ok(params) => params.unwrap_or(Value::Null),
        Err(error) => {
            return CommandResult::failure(
                "call",
                "invalid_params",
                format!("--params is not valid JSON: {error}"),
                2,
            );
        }
    };

    let store = open_store(&config.storage);
    let mut storefront = Storefront::new(
        Arc::new(Catalog::standard()),
        Arc::clone(&store),
        Arc::new(TracingOrderSink),
    );
    storefront.configurator.restore_from(store.as_ref());

    let registry = ToolRegistry::new();
    let state = shared(storefront);
    let host = config.tools.enabled.then_some(&registry as &dyn ModelContext);
    if !ToolInstaller::new().install(host, state.clone()).enabled {
        return CommandResult::failure(
            "call",
            "tools_disabled",
            "agent tools are disabled (tools.enabled = false)",
            2,
        );
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "call",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let result = registry.call(tool, params).await;
        state.lock().await.configurator.persist_to(store.as_ref());
        result
    });
    CommandResult { exit_code: if result.is_ok() { 0 } else { 1 }, output: result.text().to_string() }
}

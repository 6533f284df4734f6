//! End-to-end tool flows through the in-process registry.

use std::collections::BTreeSet;
use std::sync::Arc;

use forno_core::config::{StorageBackend, StorageConfig};
use forno_core::discovery;
use forno_core::{Catalog, InMemoryOrderSink, InMemoryStore, KeyValueStore, Storefront};
use forno_mcp::{shared, SharedStorefront, ToolInstaller, ToolRegistry, TOOL_NAMES};
use serde_json::{json, Value};
use tempfile::TempDir;

struct Harness {
    registry: ToolRegistry,
    sink: InMemoryOrderSink,
    state: SharedStorefront,
}

impl Harness {
    fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let sink = InMemoryOrderSink::default();
        let state =
            shared(Storefront::new(Arc::new(Catalog::standard()), store, Arc::new(sink.clone())));
        let registry = ToolRegistry::new();
        let report = ToolInstaller::new().install(Some(&registry), state.clone());
        assert!(report.enabled);
        Self { registry, sink, state }
    }

    fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::default()))
    }

    async fn call(&self, name: &str, params: Value) -> Value {
        self.registry.call(name, params).await.payload()
    }
}

#[tokio::test]
async fn build_and_order_pizza_flow() {
    let harness = Harness::new();

    let catalog = harness.call("menu.get_catalog", Value::Null).await;
    assert_eq!(catalog["ok"], true);

    for (category, ingredient) in
        [("size", "large"), ("sauce", "pesto"), ("toppings", "mushrooms"), ("toppings", "olives")]
    {
        let payload = harness
            .call(
                "configurator.set_selection",
                json!({"categoryId": category, "ingredientId": ingredient}),
            )
            .await;
        assert_eq!(payload["ok"], true, "{category}/{ingredient}");
    }

    let current = harness.call("configurator.get_current", Value::Null).await;
    assert_eq!(current["data"]["totalPrice"], 12.5);

    let cart = harness.call("cart.add_current_pizza", Value::Null).await;
    let pizza_id = cart["data"]["items"][0]["pizzaId"].as_str().unwrap_or_default().to_string();
    assert!(!pizza_id.is_empty());

    let updated = harness
        .call("cart.update_item_quantity", json!({"pizzaId": pizza_id, "quantity": 2}))
        .await;
    assert_eq!(updated["data"]["totalPrice"], 25.0);

    let order = harness.call("order.place", Value::Null).await;
    assert_eq!(order["message"], "Order placed");
    assert_eq!(order["data"]["totalPrice"], 25.0);
    assert_eq!(order["data"]["items"][0]["quantity"], 2);

    let orders = harness.sink.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].items[0].pizza.id.0, pizza_id);

    let snapshot = harness.call("cart.get_snapshot", Value::Null).await;
    assert_eq!(snapshot["data"]["isEmpty"], true);
    assert_eq!(snapshot["data"]["itemCount"], 0);
}

#[tokio::test]
async fn configurator_is_independent_of_cart() {
    let harness = Harness::new();
    harness
        .call("configurator.set_selection", json!({"categoryId": "cheese", "ingredientId": "burrata"}))
        .await;
    harness.call("cart.add_current_pizza", Value::Null).await;

    harness.call("configurator.reset", Value::Null).await;
    let cart = harness.call("cart.get_snapshot", Value::Null).await;

    assert_eq!(cart["data"]["items"][0]["selections"]["cheese"], json!(["mozzarella", "burrata"]));
    assert_eq!(cart["data"]["totalPrice"], 10.0);
}

#[tokio::test]
async fn identical_pizzas_stay_separate_lines() {
    let harness = Harness::new();

    harness.call("cart.add_current_pizza", Value::Null).await;
    let cart = harness.call("cart.add_current_pizza", Value::Null).await;

    let items = cart["data"]["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 2);
    assert_ne!(items[0]["pizzaId"], items[1]["pizzaId"]);
    assert_eq!(cart["data"]["itemCount"], 2);
}

#[tokio::test]
async fn cart_survives_restart_with_file_storage() {
    let dir = TempDir::new().expect("tempdir");
    let storage = StorageConfig { backend: StorageBackend::File, path: dir.path().to_path_buf() };

    let first = Harness::with_store(forno_core::state::open_store(&storage));
    first.call("cart.add_current_pizza", Value::Null).await;
    first.call("cart.add_current_pizza", Value::Null).await;

    let second = Harness::with_store(forno_core::state::open_store(&storage));
    let cart = second.call("cart.get_snapshot", Value::Null).await;

    assert_eq!(cart["data"]["itemCount"], 2);
    assert_eq!(cart["data"]["totalPrice"], 16.0);
}

#[tokio::test]
async fn rejections_leave_state_untouched() {
    let harness = Harness::new();
    harness.call("cart.add_current_pizza", Value::Null).await;
    let before = harness.state.lock().await.cart.snapshot();

    let calls = [
        ("cart.update_item_quantity", json!({"pizzaId": "ghost", "quantity": 3}), "ITEM_NOT_FOUND"),
        ("cart.update_item_quantity", json!({"pizzaId": "ghost", "quantity": 2.5}), "INVALID_QUANTITY"),
        ("cart.remove_item", json!({}), "INVALID_PIZZA_ID"),
        ("cart.clear", json!({"all": true}), "INVALID_PARAMS"),
        ("oven.preheat", Value::Null, "UNKNOWN_TOOL"),
    ];
    for (name, params, code) in calls {
        let payload = harness.call(name, params).await;
        assert_eq!(payload["ok"], false, "{name}");
        assert_eq!(payload["error"]["code"], code, "{name}");
    }

    assert_eq!(harness.state.lock().await.cart.snapshot(), before);
}

#[tokio::test]
async fn concurrent_additions_are_all_kept() {
    let harness = Arc::new(Harness::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let harness = Arc::clone(&harness);
        handles.push(tokio::spawn(async move {
            harness.call("cart.add_current_pizza", Value::Null).await
        }));
    }
    for handle in handles {
        let payload = handle.await.expect("task joins");
        assert_eq!(payload["ok"], true);
    }

    let cart = harness.call("cart.get_snapshot", Value::Null).await;
    assert_eq!(cart["data"]["itemCount"], 8);
}

#[test]
fn discovery_intents_match_registered_tools() {
    let harness = Harness::new();
    let document = discovery::document();

    let advertised: BTreeSet<&str> = document.intents().collect();
    let registered: BTreeSet<String> = harness.registry.names().into_iter().collect();

    assert_eq!(advertised, registered.iter().map(String::as_str).collect::<BTreeSet<_>>());
    assert_eq!(registered.len(), TOOL_NAMES.len());
}

#[test]
fn second_installer_pass_registers_nothing() {
    let harness = Harness::new();
    let installer = ToolInstaller::new();

    let first = installer.install(Some(&harness.registry), harness.state.clone());
    let again = installer.install(Some(&harness.registry), harness.state.clone());

    assert_eq!(first.tools.len(), 10);
    assert!(again.enabled);
    assert!(again.tools.is_empty());
    assert_eq!(harness.registry.len(), 10);
}

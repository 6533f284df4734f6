use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::order::{Order, OrderId};
use crate::domain::pizza::{CartItem, PizzaConfig};
use crate::errors::StorageError;
use crate::orders::OrderSink;
use crate::pricing::round_to_cents;
use crate::storage::KeyValueStore;

/// Storage key holding the JSON-encoded cart item list.
pub const CART_STORAGE_KEY: &str = "forno-antico-cart";

/// Largest quantity a single cart line may hold.
pub const MAX_QUANTITY: u32 = 20;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub item_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub is_empty: bool,
    pub items: Vec<CartItem>,
}

/// Ordered line items, written through to the key-value store after every change.
pub struct Cart {
    items: Vec<CartItem>,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn OrderSink>,
}

impl Cart {
    /// Restores the persisted cart, starting empty when nothing usable is stored.
    pub fn load(store: Arc<dyn KeyValueStore>, sink: Arc<dyn OrderSink>) -> Self {
        let items = restore_items(store.as_ref());
        Self { items, store, sink }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn contains(&self, pizza_id: &str) -> bool {
        self.position(pizza_id).is_some()
    }

    pub fn total_price(&self) -> Decimal {
        round_to_cents(self.items.iter().map(CartItem::line_total).sum())
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            item_count: self.item_count(),
            total_price: self.total_price(),
            is_empty: self.is_empty(),
            items: self.items.clone(),
        }
    }

    /// Appends a new line with quantity 1. Identical configurations stay separate lines.
    pub fn add_pizza(&mut self, config: PizzaConfig) {
        self.items.push(CartItem::new(config));
        self.persist();
    }

    pub fn remove_pizza(&mut self, pizza_id: &str) -> bool {
        let Some(index) = self.position(pizza_id) else {
            return false;
        };
        self.items.remove(index);
        self.persist();
        true
    }

    /// Sets an absolute quantity; zero removes the line.
    ///
    /// Returns `false` without changes for an unknown id or a quantity above [`MAX_QUANTITY`].
    pub fn update_quantity(&mut self, pizza_id: &str, quantity: u32) -> bool {
        if quantity > MAX_QUANTITY {
            return false;
        }
        let Some(index) = self.position(pizza_id) else {
            return false;
        };
        if quantity == 0 {
            return self.remove_pizza(pizza_id);
        }
        self.items[index].quantity = quantity;
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Hands the current lines to the order sink and empties the cart.
    pub fn place_order(&mut self) -> Order {
        let order = Order {
            id: OrderId::generate(),
            items: self.items.clone(),
            total_price: self.total_price(),
            created_at: Utc::now(),
        };

        self.sink.record(&order);
        self.clear();
        order
    }

    fn position(&self, pizza_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.pizza.id.0 == pizza_id)
    }

    fn persist(&self) {
        if let Err(error) = write_items(self.store.as_ref(), &self.items) {
            warn!(
                event_name = "forno.cart.persist_failed",
                key = CART_STORAGE_KEY,
                error = %error,
                "cart could not be persisted"
            );
        }
    }
}

fn write_items(store: &dyn KeyValueStore, items: &[CartItem]) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items)?;
    store.set(CART_STORAGE_KEY, &raw)
}

fn restore_items(store: &dyn KeyValueStore) -> Vec<CartItem> {
    let raw = match store.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            warn!(
                event_name = "forno.cart.restore_failed",
                key = CART_STORAGE_KEY,
                error = %error,
                "stored cart could not be read, starting empty"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartItem>>(&raw) {
        Ok(items) if items.iter().all(|item| (1..=MAX_QUANTITY).contains(&item.quantity)) => {
            debug!(event_name = "forno.cart.restored", items = items.len(), "cart restored");
            items
        }
        Ok(_) => {
            warn!(
                event_name = "forno.cart.restore_failed",
                key = CART_STORAGE_KEY,
                "stored cart holds a quantity outside 1..=20, starting empty"
            );
            Vec::new()
        }
        Err(error) => {
            warn!(
                event_name = "forno.cart.restore_failed",
                key = CART_STORAGE_KEY,
                error = %error,
                "stored cart could not be parsed, starting empty"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use crate::catalog::Catalog;
    use crate::domain::pizza::{PizzaConfig, PizzaId};
    use crate::errors::StorageError;
    use crate::orders::InMemoryOrderSink;
    use crate::state::configurator::Configurator;
    use crate::storage::{InMemoryStore, KeyValueStore};

    use super::{Cart, CART_STORAGE_KEY, MAX_QUANTITY};

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn pizza(id: &str, cents: i64) -> PizzaConfig {
        PizzaConfig {
            id: PizzaId(id.to_string()),
            selections: Catalog::standard().default_selections(),
            total_price: Decimal::new(cents, 2),
        }
    }

    fn cart_with(store: &InMemoryStore) -> (Cart, InMemoryOrderSink) {
        let sink = InMemoryOrderSink::default();
        (Cart::load(Arc::new(store.clone()), Arc::new(sink.clone())), sink)
    }

    #[test]
    fn starts_empty_without_stored_state() {
        let (cart, _) = cart_with(&InMemoryStore::default());

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn identical_configurations_become_separate_lines() {
        let (mut cart, _) = cart_with(&InMemoryStore::default());
        let configurator = Configurator::new(Arc::new(Catalog::standard()));

        cart.add_pizza(configurator.to_config());
        cart.add_pizza(configurator.to_config());

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items()[0].pizza.selections, cart.items()[1].pizza.selections);
        assert_eq!(cart.total_price(), Decimal::new(1600, 2));
    }

    #[test]
    fn totals_weight_each_line_by_quantity() {
        let (mut cart, _) = cart_with(&InMemoryStore::default());
        cart.add_pizza(pizza("a", 975));
        cart.add_pizza(pizza("b", 1050));

        assert!(cart.update_quantity("a", 3));

        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.total_price(), Decimal::new(3975, 2));
    }

    #[test]
    fn zero_quantity_matches_removal() {
        let store_a = InMemoryStore::default();
        let store_b = InMemoryStore::default();
        let (mut updated, _) = cart_with(&store_a);
        let (mut removed, _) = cart_with(&store_b);
        for cart in [&mut updated, &mut removed] {
            cart.add_pizza(pizza("a", 800));
            cart.add_pizza(pizza("b", 900));
        }

        assert!(updated.update_quantity("a", 0));
        assert!(removed.remove_pizza("a"));

        assert_eq!(updated.items(), removed.items());
        assert_eq!(store_a.get(CART_STORAGE_KEY).ok(), store_b.get(CART_STORAGE_KEY).ok());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let (mut cart, _) = cart_with(&InMemoryStore::default());
        cart.add_pizza(pizza("a", 800));

        assert!(!cart.remove_pizza("missing"));
        assert!(!cart.update_quantity("missing", 4));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn place_order_records_snapshot_and_clears() {
        let store = InMemoryStore::default();
        let (mut cart, sink) = cart_with(&store);
        cart.add_pizza(pizza("a", 1250));
        cart.update_quantity("a", 2);
        let total_before = cart.total_price();

        let order = cart.place_order();

        assert_eq!(order.total_price, total_before);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
        assert!(cart.is_empty());
        assert_eq!(sink.orders(), vec![order]);
        assert_eq!(store.get(CART_STORAGE_KEY).expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn persisted_items_round_trip_through_the_store() {
        let store = InMemoryStore::default();
        let (mut cart, _) = cart_with(&store);
        let configurator = Configurator::new(Arc::new(Catalog::standard()));
        let mut custom = configurator.clone();
        custom.toggle_multi("toppings", "onions");
        cart.add_pizza(configurator.to_config());
        cart.add_pizza(custom.to_config());
        let custom_id = cart.items()[1].pizza.id.0.clone();
        cart.update_quantity(&custom_id, 5);

        let (reloaded, _) = cart_with(&store);

        assert_eq!(reloaded.items(), cart.items());
        assert_eq!(reloaded.total_price(), cart.total_price());
    }

    #[test]
    fn corrupt_or_mismatched_storage_yields_empty_cart() {
        for raw in [
            "not json",
            r#"{"items":[]}"#,
            r#"[{"pizza":{"id":"a"},"quantity":1}]"#,
            r#"[{"pizza":{"id":"a","selections":{},"totalPrice":8},"quantity":0}]"#,
        ] {
            let (cart, _) = cart_with(&InMemoryStore::with_entry(CART_STORAGE_KEY, raw));
            assert!(cart.is_empty(), "{raw}");
        }
    }

    #[test]
    fn out_of_range_stored_quantities_yield_empty_cart() {
        let line = |id: &str, quantity: u64| {
            format!(
                r#"{{"pizza":{{"id":"{id}","selections":{{}},"totalPrice":8.5}},"quantity":{quantity}}}"#
            )
        };

        for raw in [
            format!("[{},{}]", line("a", u64::from(u32::MAX)), line("b", 2)),
            format!("[{}]", line("a", u64::from(MAX_QUANTITY) + 1)),
        ] {
            let (cart, _) = cart_with(&InMemoryStore::with_entry(CART_STORAGE_KEY, &raw));
            assert!(cart.is_empty(), "{raw}");
            assert_eq!(cart.item_count(), 0);
        }

        let within = format!("[{}]", line("a", u64::from(MAX_QUANTITY)));
        let (cart, _) = cart_with(&InMemoryStore::with_entry(CART_STORAGE_KEY, &within));
        assert_eq!(cart.item_count(), 20);
    }

    #[test]
    fn update_quantity_refuses_values_above_the_limit() {
        let (mut cart, _) = cart_with(&InMemoryStore::default());
        cart.add_pizza(pizza("a", 800));

        assert!(!cart.update_quantity("a", MAX_QUANTITY + 1));
        assert!(cart.update_quantity("a", MAX_QUANTITY));

        assert_eq!(cart.item_count(), 20);
    }

    #[test]
    fn storage_failures_never_surface() {
        let mut cart = Cart::load(Arc::new(BrokenStore), Arc::new(InMemoryOrderSink::default()));

        cart.add_pizza(pizza("a", 800));
        cart.update_quantity("a", 2);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.place_order().total_price, Decimal::new(1600, 2));
    }

    #[test]
    fn snapshot_serializes_camel_case_totals() {
        let (mut cart, _) = cart_with(&InMemoryStore::default());
        cart.add_pizza(pizza("a", 850));

        let json = serde_json::to_value(cart.snapshot()).expect("serialize snapshot");

        assert_eq!(json["itemCount"], 1);
        assert_eq!(json["totalPrice"], 8.5);
        assert_eq!(json["isEmpty"], false);
        assert_eq!(json["items"][0]["pizza"]["id"], "a");
    }
}

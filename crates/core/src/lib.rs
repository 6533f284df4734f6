//! Menu catalog, pricing, and the configurator/cart state behind Forno Antico.

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod orders;
pub mod pricing;
pub mod state;
pub mod storage;

pub use catalog::{Catalog, IngredientRef};
pub use domain::menu::{Category, Ingredient, SelectionMode};
pub use domain::order::{Order, OrderId};
pub use domain::pizza::{CartItem, PizzaConfig, PizzaId};
pub use domain::selection::{SelectionValue, Selections};
pub use errors::StorageError;
pub use orders::{InMemoryOrderSink, OrderSink, TracingOrderSink};
pub use pricing::{calculate_price, format_price};
pub use state::cart::{Cart, CartSnapshot, CART_STORAGE_KEY, MAX_QUANTITY};
pub use state::configurator::{Configurator, ConfiguratorSnapshot, CONFIGURATOR_STORAGE_KEY};
pub use state::{open_store, Storefront};
pub use storage::{FileStore, InMemoryStore, KeyValueStore};

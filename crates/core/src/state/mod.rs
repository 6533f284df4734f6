pub mod cart;
pub mod configurator;

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::{StorageBackend, StorageConfig};
use crate::domain::pizza::PizzaId;
use crate::orders::{OrderSink, TracingOrderSink};
use crate::storage::{FileStore, InMemoryStore, KeyValueStore};

use self::{cart::Cart, configurator::Configurator};

/// The one configurator and the one cart that UI handlers and agent tools both mutate.
pub struct Storefront {
    pub configurator: Configurator,
    pub cart: Cart,
}

impl Storefront {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn OrderSink>,
    ) -> Self {
        Self { configurator: Configurator::new(catalog), cart: Cart::load(store, sink) }
    }

    /// Standard menu, storage chosen by configuration, orders written to the log.
    pub fn open(storage: &StorageConfig) -> Self {
        Self::new(Arc::new(Catalog::standard()), open_store(storage), Arc::new(TracingOrderSink))
    }

    pub fn catalog(&self) -> &Catalog {
        self.configurator.catalog()
    }

    /// Moves a frozen copy of the current configuration into the cart.
    pub fn add_current_pizza(&mut self) -> PizzaId {
        let config = self.configurator.to_config();
        let id = config.id.clone();
        self.cart.add_pizza(config);
        id
    }
}

pub fn open_store(storage: &StorageConfig) -> Arc<dyn KeyValueStore> {
    match storage.backend {
        StorageBackend::Memory => Arc::new(InMemoryStore::default()),
        StorageBackend::File => Arc::new(FileStore::new(&storage.path)),
    }
}

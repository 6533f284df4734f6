use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::domain::menu::{Category, SelectionMode};
use crate::domain::pizza::{PizzaConfig, PizzaId};
use crate::domain::selection::{SelectionValue, Selections};
use crate::errors::StorageError;
use crate::pricing::calculate_price;
use crate::storage::KeyValueStore;

/// Storage key for selections carried between one-shot processes.
pub const CONFIGURATOR_STORAGE_KEY: &str = "forno-antico-configurator";

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorSnapshot {
    pub selections: Selections,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// Live ingredient selections for the pizza being built.
#[derive(Clone, Debug)]
pub struct Configurator {
    catalog: Arc<Catalog>,
    selections: Selections,
}

impl Configurator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let selections = catalog.default_selections();
        Self { catalog, selections }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn total_price(&self) -> Decimal {
        calculate_price(&self.catalog, &self.selections)
    }

    /// Replaces the value of a single-select category.
    ///
    /// Returns `false` and leaves the selections untouched when the category is unknown,
    /// is not single-select, or does not offer the ingredient.
    pub fn select_single(&mut self, category_id: &str, ingredient_id: &str) -> bool {
        if resolve(&self.catalog, category_id, ingredient_id, SelectionMode::Single).is_none() {
            return false;
        }

        self.selections
            .insert(category_id.to_string(), SelectionValue::Single(ingredient_id.to_string()));
        true
    }

    /// Adds the ingredient to a multi-select category, or removes it when already present.
    ///
    /// Same rejection rules as [`Configurator::select_single`], for multi-select categories.
    pub fn toggle_multi(&mut self, category_id: &str, ingredient_id: &str) -> bool {
        if resolve(&self.catalog, category_id, ingredient_id, SelectionMode::Multi).is_none() {
            return false;
        }

        let mut current = match self.selections.remove(category_id) {
            Some(SelectionValue::Multi(ids)) => ids,
            _ => Vec::new(),
        };
        match current.iter().position(|id| id == ingredient_id) {
            Some(index) => {
                current.remove(index);
            }
            None => current.push(ingredient_id.to_string()),
        }

        self.selections.insert(category_id.to_string(), SelectionValue::Multi(current));
        true
    }

    pub fn is_selected(&self, category_id: &str, ingredient_id: &str) -> bool {
        self.selections.get(category_id).is_some_and(|value| value.contains(ingredient_id))
    }

    pub fn reset(&mut self) {
        self.selections = self.catalog.default_selections();
    }

    /// Freezes the current selections into a new pizza with its price fixed now.
    pub fn to_config(&self) -> PizzaConfig {
        PizzaConfig {
            id: PizzaId::generate(),
            selections: self.selections.clone(),
            total_price: self.total_price(),
        }
    }

    pub fn snapshot(&self) -> ConfiguratorSnapshot {
        ConfiguratorSnapshot { selections: self.selections.clone(), total_price: self.total_price() }
    }

    /// Overlays selections saved by [`Configurator::persist_to`] onto the defaults.
    ///
    /// Anything unreadable, or any entry the catalog would not accept, leaves the
    /// current selections in place and returns `false`.
    pub fn restore_from(&mut self, store: &dyn KeyValueStore) -> bool {
        let raw = match store.get(CONFIGURATOR_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(error) => {
                warn!(
                    event_name = "forno.configurator.restore_failed",
                    key = CONFIGURATOR_STORAGE_KEY,
                    error = %error,
                    "stored selections could not be read"
                );
                return false;
            }
        };

        let stored = match serde_json::from_str::<Selections>(&raw) {
            Ok(stored) if stored.iter().all(|(id, value)| accepts(&self.catalog, id, value)) => {
                stored
            }
            Ok(_) => {
                warn!(
                    event_name = "forno.configurator.restore_failed",
                    key = CONFIGURATOR_STORAGE_KEY,
                    "stored selections do not match the menu"
                );
                return false;
            }
            Err(error) => {
                warn!(
                    event_name = "forno.configurator.restore_failed",
                    key = CONFIGURATOR_STORAGE_KEY,
                    error = %error,
                    "stored selections could not be parsed"
                );
                return false;
            }
        };

        let mut selections = self.catalog.default_selections();
        selections.extend(stored);
        self.selections = selections;
        debug!(event_name = "forno.configurator.restored", "selections restored");
        true
    }

    pub fn persist_to(&self, store: &dyn KeyValueStore) {
        let written = serde_json::to_string(&self.selections)
            .map_err(StorageError::from)
            .and_then(|raw| store.set(CONFIGURATOR_STORAGE_KEY, &raw));
        if let Err(error) = written {
            warn!(
                event_name = "forno.configurator.persist_failed",
                key = CONFIGURATOR_STORAGE_KEY,
                error = %error,
                "selections could not be persisted"
            );
        }
    }
}

fn accepts(catalog: &Catalog, category_id: &str, value: &SelectionValue) -> bool {
    let Some(category) = catalog.category(category_id) else {
        return false;
    };
    match (category.selection_mode, value) {
        (SelectionMode::Single, SelectionValue::Single(id)) => category.contains(id),
        (SelectionMode::Multi, SelectionValue::Multi(ids)) => ids
            .iter()
            .enumerate()
            .all(|(index, id)| category.contains(id) && !ids[..index].contains(id)),
        _ => false,
    }
}

fn resolve<'a>(
    catalog: &'a Catalog,
    category_id: &str,
    ingredient_id: &str,
    mode: SelectionMode,
) -> Option<&'a Category> {
    catalog
        .category(category_id)
        .filter(|category| category.selection_mode == mode && category.contains(ingredient_id))
}

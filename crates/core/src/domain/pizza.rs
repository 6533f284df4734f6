use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::selection::Selections;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PizzaId(pub String);

impl PizzaId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// A configured pizza frozen at the moment it left the configurator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PizzaConfig {
    pub id: PizzaId,
    pub selections: Selections,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub pizza: PizzaConfig,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(pizza: PizzaConfig) -> Self {
        Self { pizza, quantity: 1 }
    }

    pub fn line_total(&self) -> Decimal {
        self.pizza.total_price * Decimal::from(self.quantity)
    }
}

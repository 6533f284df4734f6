use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Selected ingredient id(s) for one category.
///
/// The shape follows the category's selection mode: one id for single-select
/// categories, a duplicate-free list for multi-select categories.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionValue {
    Single(String),
    Multi(Vec<String>),
}

impl SelectionValue {
    pub fn ids(&self) -> &[String] {
        match self {
            Self::Single(id) => std::slice::from_ref(id),
            Self::Multi(ids) => ids,
        }
    }

    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.ids().iter().any(|id| id == ingredient_id)
    }
}

/// Category id -> selection value.
pub type Selections = BTreeMap<String, SelectionValue>;

/// Selections for a freshly opened configurator.
pub fn default_selections() -> Selections {
    let mut selections = Selections::new();
    selections.insert("size".to_string(), SelectionValue::Single("medium".to_string()));
    selections.insert("dough".to_string(), SelectionValue::Single("classic".to_string()));
    selections.insert("sauce".to_string(), SelectionValue::Single("tomato".to_string()));
    selections.insert("cheese".to_string(), SelectionValue::Multi(vec!["mozzarella".to_string()]));
    selections.insert("toppings".to_string(), SelectionValue::Multi(Vec::new()));
    selections
}

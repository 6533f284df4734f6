use serde::Serialize;

use crate::domain::menu::{standard_categories, Category, Ingredient};
use crate::domain::selection::{default_selections, Selections};

/// Immutable menu: categories in display order plus the starting selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    defaults: Selections,
}

/// A resolved ingredient together with the category it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IngredientRef<'a> {
    pub category: &'a Category,
    pub ingredient: &'a Ingredient,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn new(categories: Vec<Category>, defaults: Selections) -> Self {
        Self { categories, defaults }
    }

    /// The Forno Antico menu.
    pub fn standard() -> Self {
        Self::new(standard_categories(), default_selections())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == category_id)
    }

    pub fn ingredient(&self, category_id: &str, ingredient_id: &str) -> Option<IngredientRef<'_>> {
        let category = self.category(category_id)?;
        let ingredient = category.ingredient(ingredient_id)?;
        Some(IngredientRef { category, ingredient })
    }

    /// A fresh deep copy of the default selections.
    pub fn default_selections(&self) -> Selections {
        self.defaults.clone()
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How many ingredients a customer may pick from a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Single,
    Multi,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Display icon shown next to the ingredient name.
    pub emoji: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub selection_mode: SelectionMode,
    pub ingredients: Vec<Ingredient>,
}

impl Category {
    pub fn ingredient(&self, ingredient_id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|ingredient| ingredient.id == ingredient_id)
    }

    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.ingredient(ingredient_id).is_some()
    }
}

impl Ingredient {
    fn new(id: &str, name: &str, emoji: &str, price: Decimal) -> Self {
        Self { id: id.to_string(), name: name.to_string(), emoji: emoji.to_string(), price }
    }
}

fn euros(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// The full Forno Antico menu in display order.
pub fn standard_categories() -> Vec<Category> {
    vec![
        Category {
            id: "size".to_string(),
            name: "Size".to_string(),
            emoji: "📏".to_string(),
            description: "Choose your pizza size".to_string(),
            selection_mode: SelectionMode::Single,
            ingredients: vec![
                Ingredient::new("small", "Piccola (10\")", "🍕", euros(600)),
                Ingredient::new("medium", "Media (12\")", "🍕", euros(800)),
                Ingredient::new("large", "Grande (14\")", "🍕", euros(1000)),
                Ingredient::new("family", "Famiglia (16\")", "🍕", euros(1300)),
            ],
        },
        Category {
            id: "dough".to_string(),
            name: "Dough".to_string(),
            emoji: "🫓".to_string(),
            description: "Select your dough type".to_string(),
            selection_mode: SelectionMode::Single,
            ingredients: vec![
                Ingredient::new("classic", "Classic", "🫓", euros(0)),
                Ingredient::new("thin", "Thin Crust", "🥖", euros(0)),
                Ingredient::new("wholewheat", "Whole Wheat", "🌾", euros(100)),
                Ingredient::new("stuffed", "Stuffed Crust", "🧀", euros(200)),
            ],
        },
        Category {
            id: "sauce".to_string(),
            name: "Sauce".to_string(),
            emoji: "🫙".to_string(),
            description: "Pick your base sauce".to_string(),
            selection_mode: SelectionMode::Single,
            ingredients: vec![
                Ingredient::new("tomato", "Tomato", "🍅", euros(0)),
                Ingredient::new("white", "White (Alfredo)", "🥛", euros(50)),
                Ingredient::new("pesto", "Pesto", "🌿", euros(50)),
                Ingredient::new("bbq", "BBQ", "🔥", euros(50)),
                Ingredient::new("none", "No Sauce", "❌", euros(0)),
            ],
        },
        Category {
            id: "cheese".to_string(),
            name: "Cheese".to_string(),
            emoji: "🧀".to_string(),
            description: "Add your cheeses".to_string(),
            selection_mode: SelectionMode::Multi,
            ingredients: vec![
                Ingredient::new("mozzarella", "Mozzarella", "🧀", euros(0)),
                Ingredient::new("parmesan", "Parmigiano", "🧀", euros(100)),
                Ingredient::new("gorgonzola", "Gorgonzola", "🧀", euros(150)),
                Ingredient::new("burrata", "Burrata", "🫧", euros(200)),
                Ingredient::new("ricotta", "Ricotta", "🥣", euros(100)),
                Ingredient::new("vegan", "Vegan Cheese", "🌱", euros(150)),
            ],
        },
        Category {
            id: "toppings".to_string(),
            name: "Toppings".to_string(),
            emoji: "🥗".to_string(),
            description: "Load up your toppings".to_string(),
            selection_mode: SelectionMode::Multi,
            ingredients: vec![
                Ingredient::new("pepperoni", "Pepperoni", "🥓", euros(150)),
                Ingredient::new("ham", "Prosciutto", "🍖", euros(200)),
                Ingredient::new("salami", "Salami", "🥩", euros(150)),
                Ingredient::new("mushrooms", "Mushrooms", "🍄", euros(100)),
                Ingredient::new("olives", "Olives", "🫒", euros(100)),
                Ingredient::new("peppers", "Bell Peppers", "🫑", euros(100)),
                Ingredient::new("onions", "Red Onions", "🧅", euros(75)),
                Ingredient::new("artichokes", "Artichokes", "🌻", euros(150)),
                Ingredient::new("arugula", "Arugula", "🥬", euros(75)),
                Ingredient::new("anchovies", "Anchovies", "🐟", euros(150)),
                Ingredient::new("jalapenos", "Jalapeños", "🌶️", euros(100)),
                Ingredient::new("truffle", "Truffle Oil", "🫘", euros(300)),
            ],
        },
    ]
}

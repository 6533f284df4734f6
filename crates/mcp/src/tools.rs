//! The ten storefront tools.
//!
//! Each tool is a plain handler over `&mut Storefront`. [`StorefrontTool`] wraps a
//! handler at registration time: it checks the parameter keys against the declared
//! schema, serializes access to the storefront, and converts every outcome (rejection,
//! error, or panic) into a [`ToolResult`] envelope.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use forno_core::{CartItem, CartSnapshot, SelectionMode, Selections, Storefront, MAX_QUANTITY};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::error;

use crate::envelope::{ErrorCode, ToolResult};
use crate::registry::{RegisteredTool, ToolDefinition, ToolExecutor};
use crate::{SharedStorefront, ToolError};

/// Tool names in registration order.
pub const TOOL_NAMES: [&str; 10] = [
    "menu.get_catalog",
    "configurator.get_current",
    "configurator.set_selection",
    "configurator.reset",
    "cart.add_current_pizza",
    "cart.get_snapshot",
    "cart.update_item_quantity",
    "cart.remove_item",
    "cart.clear",
    "order.place",
];

pub type ToolHandler = fn(&mut Storefront, &Map<String, Value>) -> Result<ToolSuccess, ToolError>;

#[derive(Clone, Debug, PartialEq)]
pub struct ToolSuccess {
    pub message: String,
    pub data: Option<Value>,
}

impl ToolSuccess {
    pub fn with_data(message: &str, data: impl Serialize) -> Result<Self, ToolError> {
        Ok(Self { message: message.to_string(), data: Some(serde_json::to_value(data)?) })
    }
}

/// Registration boundary around one handler.
pub struct StorefrontTool {
    name: String,
    allowed_keys: Vec<String>,
    state: SharedStorefront,
    handler: ToolHandler,
}

impl StorefrontTool {
    pub fn register(
        definition: ToolDefinition,
        state: SharedStorefront,
        handler: ToolHandler,
    ) -> RegisteredTool {
        let allowed_keys = definition.input_schema["properties"]
            .as_object()
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default();
        let executor =
            Self { name: definition.name.clone(), allowed_keys, state, handler };
        RegisteredTool { definition, executor: Arc::new(executor) }
    }

    fn normalize(&self, params: Value) -> Result<Map<String, Value>, String> {
        let params = match params {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => return Err(format!("parameters must be an object, got {}", type_name(&other))),
        };

        if let Some(key) = params.keys().find(|key| !self.allowed_keys.contains(key)) {
            return Err(format!("unexpected parameter `{key}` for {}", self.name));
        }
        Ok(params)
    }

    fn unexpected(&self, details: &str) -> ToolResult {
        error!(
            event_name = "forno.tools.unexpected_error",
            tool = %self.name,
            error = %details,
            "tool failed"
        );
        ToolResult::failure(ErrorCode::UnexpectedError, details)
    }
}

#[async_trait]
impl ToolExecutor for StorefrontTool {
    async fn execute(&self, params: Value) -> ToolResult {
        let params = match self.normalize(params) {
            Ok(params) => params,
            Err(details) => return ToolResult::failure(ErrorCode::InvalidParams, &details),
        };

        let mut storefront = self.state.lock().await;
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(&mut *storefront, &params)));

        match outcome {
            Ok(Ok(success)) => ToolResult::success(&success.message, success.data.as_ref()),
            Ok(Err(ToolError::Rejected { code, details })) => ToolResult::failure(code, &details),
            Ok(Err(error)) => self.unexpected(&error.to_string()),
            Err(payload) => self.unexpected(&panic_message(payload.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "tool panicked".to_string()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// All storefront tools bound to `state`, in registration order.
pub fn storefront_tools(state: SharedStorefront) -> Vec<RegisteredTool> {
    let no_params = || object_schema(json!({}), &[]);
    let pizza_id = json!({"type": "string", "description": "Pizza config ID from cart snapshot."});

    let register = |tool_definition: ToolDefinition, handler: ToolHandler| {
        StorefrontTool::register(tool_definition, state.clone(), handler)
    };

    vec![
        register(
            definition(
                "menu.get_catalog",
                "Return all pizza categories, ingredient IDs, names, prices, and selection rules. \
                 Use this first to discover valid values.",
                no_params(),
                true,
            ),
            get_catalog,
        ),
        register(
            definition(
                "configurator.get_current",
                "Return current configurator selections and live total price.",
                no_params(),
                true,
            ),
            get_current,
        ),
        register(
            definition(
                "configurator.set_selection",
                "Set or toggle an ingredient in a category. Use mode=\"set\" for single-select \
                 categories and mode=\"toggle\" for multi-select categories.",
                object_schema(
                    json!({
                        "categoryId": {
                            "type": "string",
                            "description": "Category ID (size, dough, sauce, cheese, toppings)."
                        },
                        "ingredientId": {
                            "type": "string",
                            "description": "Ingredient ID from menu.get_catalog."
                        },
                        "mode": {
                            "type": "string",
                            "enum": ["set", "toggle"],
                            "description": "Optional override; defaults based on category mode."
                        }
                    }),
                    &["categoryId", "ingredientId"],
                ),
                false,
            ),
            set_selection,
        ),
        register(
            definition(
                "configurator.reset",
                "Reset configurator selections to defaults.",
                no_params(),
                false,
            ),
            reset,
        ),
        register(
            definition(
                "cart.add_current_pizza",
                "Create a pizza config from current selections and add it to cart with quantity 1. \
                 Returns updated cart snapshot.",
                no_params(),
                false,
            ),
            add_current_pizza,
        ),
        register(
            definition(
                "cart.get_snapshot",
                "Return cart items, totals, and item count.",
                no_params(),
                true,
            ),
            get_snapshot,
        ),
        register(
            definition(
                "cart.update_item_quantity",
                "Update quantity for a cart pizza item by pizzaId. Set quantity to 0 to remove the item.",
                object_schema(
                    json!({
                        "pizzaId": pizza_id.clone(),
                        "quantity": {
                            "type": "number",
                            "minimum": 0,
                            "maximum": MAX_QUANTITY,
                            "description": "New quantity, 0-20."
                        }
                    }),
                    &["pizzaId", "quantity"],
                ),
                false,
            ),
            update_item_quantity,
        ),
        register(
            definition(
                "cart.remove_item",
                "Remove one pizza item from the cart by pizzaId.",
                object_schema(json!({ "pizzaId": pizza_id }), &["pizzaId"]),
                false,
            ),
            remove_item,
        ),
        register(definition("cart.clear", "Clear the entire cart.", no_params(), false), clear),
        register(
            definition(
                "order.place",
                "Place an order from the current cart and return the order summary.",
                no_params(),
                false,
            ),
            place_order,
        ),
    ]
}

fn definition(name: &str, description: &str, input_schema: Value, read_only: bool) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
        annotations: read_only.then(|| json!({ "readOnlyHint": true })),
    }
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    let mut schema = json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema
}

/// What agents see of the cart: lines flattened to their pizza id and unit price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartView {
    item_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    total_price: Decimal,
    is_empty: bool,
    items: Vec<CartLineView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartLineView {
    pizza_id: String,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    total_price: Decimal,
    selections: Selections,
}

impl From<CartSnapshot> for CartView {
    fn from(snapshot: CartSnapshot) -> Self {
        Self {
            item_count: snapshot.item_count,
            total_price: snapshot.total_price,
            is_empty: snapshot.is_empty,
            items: snapshot.items.into_iter().map(CartLineView::from).collect(),
        }
    }
}

impl From<CartItem> for CartLineView {
    fn from(item: CartItem) -> Self {
        Self {
            pizza_id: item.pizza.id.0,
            quantity: item.quantity,
            total_price: item.pizza.total_price,
            selections: item.pizza.selections,
        }
    }
}

fn cart_view(storefront: &Storefront) -> CartView {
    CartView::from(storefront.cart.snapshot())
}

fn get_catalog(storefront: &mut Storefront, _: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    ToolSuccess::with_data(
        "Catalog returned",
        json!({ "categories": storefront.catalog().categories() }),
    )
}

fn get_current(storefront: &mut Storefront, _: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    ToolSuccess::with_data("Configurator snapshot returned", storefront.configurator.snapshot())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Set,
    Toggle,
}

impl Operation {
    /// Anything other than `set`/`toggle` counts as no override.
    fn parse(value: Option<&Value>) -> Option<Self> {
        match value.and_then(Value::as_str) {
            Some("set") => Some(Self::Set),
            Some("toggle") => Some(Self::Toggle),
            _ => None,
        }
    }

    fn native(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Set,
            SelectionMode::Multi => Self::Toggle,
        }
    }
}

fn set_selection(
    storefront: &mut Storefront,
    params: &Map<String, Value>,
) -> Result<ToolSuccess, ToolError> {
    let category = params
        .get("categoryId")
        .and_then(Value::as_str)
        .and_then(|id| storefront.catalog().category(id))
        .ok_or_else(|| {
            ToolError::rejected(ErrorCode::InvalidCategory, "categoryId is missing or invalid.")
        })?;

    let ingredient_id = params
        .get("ingredientId")
        .and_then(Value::as_str)
        .filter(|id| category.contains(id))
        .ok_or_else(|| {
            ToolError::rejected(
                ErrorCode::InvalidIngredient,
                "ingredientId does not belong to the provided category.",
            )
        })?
        .to_string();

    let native = category.selection_mode;
    let category_id = category.id.clone();

    let operation = Operation::parse(params.get("mode")).unwrap_or(Operation::native(native));
    match (operation, native) {
        (Operation::Set, SelectionMode::Multi) => {
            return Err(ToolError::rejected(
                ErrorCode::InvalidMode,
                "Use toggle mode for this multi-select category.",
            ))
        }
        (Operation::Toggle, SelectionMode::Single) => {
            return Err(ToolError::rejected(
                ErrorCode::InvalidMode,
                "Use set mode for this single-select category.",
            ))
        }
        (Operation::Set, SelectionMode::Single) => {
            storefront.configurator.select_single(&category_id, &ingredient_id);
        }
        (Operation::Toggle, SelectionMode::Multi) => {
            storefront.configurator.toggle_multi(&category_id, &ingredient_id);
        }
    }

    ToolSuccess::with_data("Selection updated", storefront.configurator.snapshot())
}

fn reset(storefront: &mut Storefront, _: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    storefront.configurator.reset();
    ToolSuccess::with_data("Configurator reset to defaults", storefront.configurator.snapshot())
}

fn add_current_pizza(
    storefront: &mut Storefront,
    _: &Map<String, Value>,
) -> Result<ToolSuccess, ToolError> {
    storefront.add_current_pizza();
    ToolSuccess::with_data("Pizza added to cart", cart_view(storefront))
}

fn get_snapshot(storefront: &mut Storefront, _: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    ToolSuccess::with_data("Cart snapshot returned", cart_view(storefront))
}

fn pizza_id_param(params: &Map<String, Value>) -> Result<String, ToolError> {
    params
        .get("pizzaId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ToolError::rejected(ErrorCode::InvalidPizzaId, "pizzaId must be a non-empty string.")
        })
}

/// Integral JSON numbers in `0..=20`; `3.0` passes, `2.5` and `"3"` do not.
fn quantity_param(value: Option<&Value>) -> Option<u32> {
    let value = value?;
    if let Some(quantity) = value.as_u64() {
        return u32::try_from(quantity).ok().filter(|quantity| *quantity <= MAX_QUANTITY);
    }
    let quantity = value.as_f64()?;
    (quantity.fract() == 0.0 && (0.0..=f64::from(MAX_QUANTITY)).contains(&quantity))
        .then_some(quantity as u32)
}

fn update_item_quantity(
    storefront: &mut Storefront,
    params: &Map<String, Value>,
) -> Result<ToolSuccess, ToolError> {
    let pizza_id = pizza_id_param(params)?;
    let quantity = quantity_param(params.get("quantity")).ok_or_else(|| {
        ToolError::rejected(
            ErrorCode::InvalidQuantity,
            "quantity must be an integer between 0 and 20.",
        )
    })?;

    if !storefront.cart.update_quantity(&pizza_id, quantity) {
        return Err(ToolError::rejected(
            ErrorCode::ItemNotFound,
            "No cart item found for the provided pizzaId.",
        ));
    }
    ToolSuccess::with_data("Cart quantity updated", cart_view(storefront))
}

fn remove_item(storefront: &mut Storefront, params: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    let pizza_id = pizza_id_param(params)?;
    storefront.cart.remove_pizza(&pizza_id);
    ToolSuccess::with_data("Item removed from cart", cart_view(storefront))
}

fn clear(storefront: &mut Storefront, _: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    storefront.cart.clear();
    ToolSuccess::with_data("Cart cleared", cart_view(storefront))
}

fn place_order(storefront: &mut Storefront, _: &Map<String, Value>) -> Result<ToolSuccess, ToolError> {
    if storefront.cart.is_empty() {
        return Err(ToolError::rejected(
            ErrorCode::CartEmpty,
            "Cannot place order because cart is empty.",
        ));
    }
    let order = storefront.cart.place_order();
    ToolSuccess::with_data("Order placed", order)
}

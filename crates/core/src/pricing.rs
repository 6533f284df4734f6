use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::Catalog;
use crate::domain::selection::Selections;

pub const CURRENCY_SYMBOL: &str = "€";

/// Sum of the prices of every selected ingredient, rounded to cents.
///
/// Categories are visited in catalog order. Keys that are not catalog categories and
/// ingredient ids that do not resolve inside their category contribute nothing.
pub fn calculate_price(catalog: &Catalog, selections: &Selections) -> Decimal {
    let total: Decimal = catalog
        .categories()
        .iter()
        .filter_map(|category| selections.get(&category.id).map(|value| (category, value)))
        .flat_map(|(category, value)| {
            value.ids().iter().filter_map(move |id| category.ingredient(id))
        })
        .map(|ingredient| ingredient.price)
        .sum();

    round_to_cents(total)
}

pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_price(amount: Decimal) -> String {
    format!("{CURRENCY_SYMBOL}{:.2}", round_to_cents(amount))
}

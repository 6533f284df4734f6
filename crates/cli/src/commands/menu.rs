use forno_core::{format_price, Catalog, SelectionMode};

pub fn run() -> String {
    render(&Catalog::standard())
}

pub fn render(catalog: &Catalog) -> String {
    let defaults = catalog.default_selections();
    let mut lines = Vec::new();

    for category in catalog.categories() {
        let mode = match category.selection_mode {
            SelectionMode::Single => "pick one",
            SelectionMode::Multi => "pick any",
        };
        lines.push(format!("{} {} [{}] ({mode})", category.emoji, category.name, category.id));

        for ingredient in &category.ingredients {
            let marker = if defaults
                .get(&category.id)
                .is_some_and(|selected| selected.contains(&ingredient.id))
            {
                "*"
            } else {
                " "
            };
            lines.push(format!(
                "  {marker} {:<12} {:<18} {}",
                ingredient.id,
                ingredient.name,
                format_price(ingredient.price)
            ));
        }
    }

    lines.push("(* = default selection)".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use forno_core::Catalog;

    use super::render;

    #[test]
    fn lists_every_category_with_prices() {
        let output = render(&Catalog::standard());

        assert!(output.contains("[size] (pick one)"));
        assert!(output.contains("[toppings] (pick any)"));
        assert!(output.contains("€2.00"));
    }

    #[test]
    fn marks_defaults() {
        let output = render(&Catalog::standard());

        let medium = output.lines().find(|line| line.contains("medium")).unwrap_or_default();
        let large = output.lines().find(|line| line.contains("large")).unwrap_or_default();
        assert!(medium.trim_start().starts_with('*'));
        assert!(!large.trim_start().starts_with('*'));
    }
}

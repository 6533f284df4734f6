use std::sync::Arc;

use forno_core::{Catalog, InMemoryOrderSink, InMemoryStore, Storefront};
use forno_mcp::{shared, storefront_tools};

/// One line per tool; read-only tools are tagged.
pub fn run() -> String {
    let state = shared(Storefront::new(
        Arc::new(Catalog::standard()),
        Arc::new(InMemoryStore::default()),
        Arc::new(InMemoryOrderSink::default()),
    ));

    storefront_tools(state)
        .iter()
        .map(|tool| {
            let tag = if tool.definition.is_read_only() { " [read-only]" } else { "" };
            format!("- {}{tag}: {}", tool.name(), tool.definition.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

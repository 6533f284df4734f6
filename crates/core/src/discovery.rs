//! Static descriptor advertising the agent tools and the suggested ordering flow.
//!
//! The document never depends on runtime state.

use serde::{Deserialize, Serialize};

pub const DISCOVERY_PATH: &str = "/.well-known/webmcp";
pub const DISCOVERY_CACHE_CONTROL: &str = "public, max-age=300";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    pub spec: String,
    pub site: SiteDescriptor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub pages: Vec<PageDescriptor>,
    pub flows: Vec<FlowDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDescriptor {
    pub url: String,
    pub intents: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDescriptor {
    pub id: String,
    pub description: String,
    pub steps: Vec<FlowStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStep {
    pub intent: String,
    pub page: String,
}

const CONFIGURATOR_PAGE: &str = "/configurator";
const ORDER_PAGE: &str = "/order";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn step(intent: &str, page: &str) -> FlowStep {
    FlowStep { intent: intent.to_string(), page: page.to_string() }
}

pub fn document() -> DiscoveryDocument {
    DiscoveryDocument {
        spec: "webmcp/0.1".to_string(),
        site: SiteDescriptor {
            name: "Forno Antico".to_string(),
            version: "2026.02-demo".to_string(),
            description: "Pizza configurator demo with WebMCP-compatible agent tools.".to_string(),
            pages: vec![
                PageDescriptor {
                    url: CONFIGURATOR_PAGE.to_string(),
                    intents: strings(&[
                        "menu.get_catalog",
                        "configurator.get_current",
                        "configurator.set_selection",
                        "configurator.reset",
                        "cart.add_current_pizza",
                    ]),
                },
                PageDescriptor {
                    url: ORDER_PAGE.to_string(),
                    intents: strings(&[
                        "cart.get_snapshot",
                        "cart.update_item_quantity",
                        "cart.remove_item",
                        "cart.clear",
                        "order.place",
                    ]),
                },
            ],
            flows: vec![FlowDescriptor {
                id: "build_and_order_pizza".to_string(),
                description:
                    "Discover menu, configure pizza, add to cart, review cart, and place order."
                        .to_string(),
                steps: vec![
                    step("menu.get_catalog", CONFIGURATOR_PAGE),
                    step("configurator.set_selection", CONFIGURATOR_PAGE),
                    step("cart.add_current_pizza", CONFIGURATOR_PAGE),
                    step("cart.get_snapshot", ORDER_PAGE),
                    step("order.place", ORDER_PAGE),
                ],
            }],
        },
    }
}

impl DiscoveryDocument {
    /// Every intent named on any page, in page order.
    pub fn intents(&self) -> impl Iterator<Item = &str> {
        self.site.pages.iter().flat_map(|page| page.intents.iter().map(String::as_str))
    }
}

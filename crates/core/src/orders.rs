use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::domain::order::Order;
use crate::pricing::format_price;

/// Receives every placed order. Placement never fails because of a sink.
pub trait OrderSink: Send + Sync {
    fn record(&self, order: &Order);
}

/// Writes placed orders to the log as pretty JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingOrderSink;

impl OrderSink for TracingOrderSink {
    fn record(&self, order: &Order) {
        match serde_json::to_string_pretty(order) {
            Ok(payload) => info!(
                event_name = "forno.order.placed",
                order_id = %order.id.0,
                item_count = order.items.len(),
                total = %format_price(order.total_price),
                "order placed\n{payload}"
            ),
            Err(error) => warn!(
                event_name = "forno.order.encode_failed",
                order_id = %order.id.0,
                error = %error,
                "order placed but could not be encoded"
            ),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOrderSink {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl InMemoryOrderSink {
    pub fn orders(&self) -> Vec<Order> {
        match self.orders.lock() {
            Ok(orders) => orders.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl OrderSink for InMemoryOrderSink {
    fn record(&self, order: &Order) {
        match self.orders.lock() {
            Ok(mut orders) => orders.push(order.clone()),
            Err(poisoned) => poisoned.into_inner().push(order.clone()),
        }
    }
}

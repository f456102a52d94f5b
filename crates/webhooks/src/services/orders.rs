//! Order-received side effect.
//!
//! Intake currently terminates in structured logs: one summary event per
//! order and one event per line item, keyed so downstream log tooling can
//! reconstruct the order. Fulfillment dispatch hangs off this seam once the
//! production pipeline consumes intake events.

use printloom_core::IdempotencyKey;
use tracing::info;

use crate::shopify::OrderPayload;

/// Log the intake summary for a first-delivery order.
pub fn log_order_received(key: &IdempotencyKey, topic: &str, order: &OrderPayload) {
    let total = order
        .total()
        .map_or_else(|| "unknown".to_string(), |price| price.to_string());

    info!(
        shop = %key.shop(),
        order_id = %key.order_id(),
        order_name = order.name.as_deref().unwrap_or("(unnamed)"),
        %topic,
        %total,
        customer_email = order
            .customer
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .unwrap_or("(none)"),
        line_item_count = order.line_items.len(),
        "Order received"
    );

    for (position, item) in order.line_items.iter().enumerate() {
        info!(
            order_id = %key.order_id(),
            position,
            sku = item.sku.as_deref().unwrap_or("(no sku)"),
            title = item.title.as_deref().unwrap_or("(untitled)"),
            quantity = item.quantity.unwrap_or(0),
            price = %item
                .price
                .map_or_else(|| "unknown".to_string(), |p| p.to_string()),
            "Order line item"
        );
    }
}

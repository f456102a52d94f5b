//! Typed order-creation webhook payload.
//!
//! Shopify's REST webhook bodies carry far more fields than intake needs;
//! serde ignores the rest. Only `id` is required - deliveries are
//! deduplicated on `{shop}:{id}` alone, so a payload that parses with
//! nothing else still identifies its order.

use printloom_core::{CurrencyCode, CustomerId, OrderId, Price, ProductId, VariantId};
use rust_decimal::Decimal;
use serde::Deserialize;

/// An `orders/create` webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPayload {
    /// Shopify's numeric order ID.
    pub id: OrderId,
    /// Human-facing order name (e.g., "#1001").
    pub name: Option<String>,
    /// Order total, transported as a JSON string ("24.99").
    pub total_price: Option<Decimal>,
    /// ISO 4217 currency the shop settled in.
    pub currency: Option<CurrencyCode>,
    /// Buyer details.
    pub customer: Option<Customer>,
    /// Destination address.
    pub shipping_address: Option<ShippingAddress>,
    /// Purchased items.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl OrderPayload {
    /// The order total as a [`Price`], when the payload carries both the
    /// amount and the currency.
    #[must_use]
    pub fn total(&self) -> Option<Price> {
        match (self.total_price, self.currency.clone()) {
            (Some(amount), Some(currency)) => Some(Price::new(amount, currency)),
            _ => None,
        }
    }
}

/// Buyer details on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    /// Shopify's numeric customer ID.
    pub id: Option<CustomerId>,
    /// Buyer email address.
    pub email: Option<String>,
}

/// Destination address on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingAddress {
    pub phone: Option<String>,
    pub address1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// One purchased item on an order.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    /// Merchant's stock keeping unit.
    pub sku: Option<String>,
    /// Product title at time of purchase.
    pub title: Option<String>,
    /// Units purchased.
    pub quantity: Option<i64>,
    /// Per-unit price, transported as a JSON string.
    pub price: Option<Decimal>,
    /// Shopify's numeric product ID.
    pub product_id: Option<ProductId>,
    /// Shopify's numeric variant ID.
    pub variant_id: Option<VariantId>,
}

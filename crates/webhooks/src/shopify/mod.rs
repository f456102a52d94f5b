//! Shopify webhook wire format.
//!
//! # Architecture
//!
//! Shopify signs every webhook delivery with HMAC-SHA256 over the exact raw
//! request body, transported base64-encoded in the `x-shopify-hmac-sha256`
//! header. Verification therefore has to happen on the untouched bytes,
//! before any JSON parsing.
//!
//! - [`verify`] - Signature verification (constant-time comparison)
//! - [`types`] - Typed order-creation payload (REST webhook shape)

pub mod types;
pub mod verify;

pub use types::{Customer, LineItem, OrderPayload, ShippingAddress};
pub use verify::{SignatureError, verify_signature};

/// Header carrying the base64-encoded HMAC-SHA256 of the raw body.
pub const HMAC_HEADER: &str = "x-shopify-hmac-sha256";

/// Header carrying the event topic (e.g., `orders/create`).
pub const TOPIC_HEADER: &str = "x-shopify-topic";

/// Header carrying the originating shop's domain.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";

/// The one topic this service subscribes to.
pub const ORDERS_CREATE_TOPIC: &str = "orders/create";

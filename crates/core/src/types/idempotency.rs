//! Idempotency key for duplicate webhook suppression.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::OrderId;
use super::shop::ShopDomain;

/// Composite key identifying one logical order-creation event.
///
/// Upstream webhook delivery is at-least-once, so the same order can arrive
/// more than once. Deliveries are deduplicated on `{shop}:{order_id}` alone;
/// payload bytes play no part in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdempotencyKey {
    shop: ShopDomain,
    order_id: OrderId,
}

impl IdempotencyKey {
    /// Create a key from a shop domain and an order ID.
    #[must_use]
    pub const fn new(shop: ShopDomain, order_id: OrderId) -> Self {
        Self { shop, order_id }
    }

    /// The shop this event originated from.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// The order the event describes.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.shop, self.order_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shop() -> ShopDomain {
        ShopDomain::parse("test.myshopify.com").unwrap()
    }

    #[test]
    fn test_display_format() {
        let key = IdempotencyKey::new(shop(), OrderId::new(1001));
        assert_eq!(key.to_string(), "test.myshopify.com:1001");
    }

    #[test]
    fn test_same_order_same_key() {
        let a = IdempotencyKey::new(shop(), OrderId::new(1001));
        let b = IdempotencyKey::new(shop(), OrderId::new(1001));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_shops_distinct_keys() {
        let a = IdempotencyKey::new(shop(), OrderId::new(1001));
        let b = IdempotencyKey::new(
            ShopDomain::parse("other.myshopify.com").unwrap(),
            OrderId::new(1001),
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_set_membership() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        assert!(seen.insert(IdempotencyKey::new(shop(), OrderId::new(1))));
        assert!(!seen.insert(IdempotencyKey::new(shop(), OrderId::new(1))));
    }
}

//! Idempotency store for webhook deliveries.
//!
//! Upstream delivery is at-least-once, so the same order-creation event can
//! arrive any number of times. The store remembers which keys have been
//! handled and lets the receiver acknowledge repeats without re-running the
//! order side effect.
//!
//! Backed by a bounded `moka` cache with a TTL rather than a process-lifetime
//! set: memory stays bounded on a long-running process, and the recording
//! operation is a single atomic insert-if-absent, so two simultaneous
//! deliveries of the same order resolve to exactly one first delivery.

use std::time::Duration;

use moka::future::Cache;
use printloom_core::IdempotencyKey;

/// Whether a delivery is the first for its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// First time this key was seen; the caller should run the handler.
    FirstDelivery,
    /// Key already recorded; acknowledge without reprocessing.
    Duplicate,
}

/// Bounded, TTL-evicting set of handled idempotency keys.
#[derive(Clone)]
pub struct DedupeStore {
    seen: Cache<IdempotencyKey, ()>,
}

impl std::fmt::Debug for DedupeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DedupeStore")
            .field("entry_count", &self.seen.entry_count())
            .finish_non_exhaustive()
    }
}

impl DedupeStore {
    /// Create a store holding at most `capacity` keys, each for `ttl`.
    ///
    /// A key older than `ttl` may be evicted, after which a re-delivery
    /// would be processed again; the TTL should exceed the upstream
    /// sender's retry window.
    #[must_use]
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let seen = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { seen }
    }

    /// Record `key`, reporting whether this call inserted it.
    ///
    /// Atomic insert-if-absent: under concurrent calls with the same key,
    /// exactly one caller observes [`DeliveryStatus::FirstDelivery`].
    pub async fn record(&self, key: IdempotencyKey) -> DeliveryStatus {
        let entry = self.seen.entry(key).or_insert(()).await;

        if entry.is_fresh() {
            DeliveryStatus::FirstDelivery
        } else {
            DeliveryStatus::Duplicate
        }
    }

    /// Number of keys currently tracked (approximate under concurrency).
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.seen.entry_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use printloom_core::{OrderId, ShopDomain};

    fn key(shop: &str, order_id: i64) -> IdempotencyKey {
        IdempotencyKey::new(ShopDomain::parse(shop).unwrap(), OrderId::new(order_id))
    }

    fn store() -> DedupeStore {
        DedupeStore::new(1000, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_first_then_duplicate() {
        let store = store();

        assert_eq!(
            store.record(key("test.myshopify.com", 1001)).await,
            DeliveryStatus::FirstDelivery
        );
        assert_eq!(
            store.record(key("test.myshopify.com", 1001)).await,
            DeliveryStatus::Duplicate
        );
        assert_eq!(
            store.record(key("test.myshopify.com", 1001)).await,
            DeliveryStatus::Duplicate
        );
    }

    #[tokio::test]
    async fn test_distinct_orders_are_independent() {
        let store = store();

        assert_eq!(
            store.record(key("test.myshopify.com", 1001)).await,
            DeliveryStatus::FirstDelivery
        );
        assert_eq!(
            store.record(key("test.myshopify.com", 1002)).await,
            DeliveryStatus::FirstDelivery
        );
    }

    #[tokio::test]
    async fn test_same_order_different_shops_are_independent() {
        let store = store();

        assert_eq!(
            store.record(key("a.myshopify.com", 1001)).await,
            DeliveryStatus::FirstDelivery
        );
        assert_eq!(
            store.record(key("b.myshopify.com", 1001)).await,
            DeliveryStatus::FirstDelivery
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicates_record_once() {
        let store = store();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.record(key("test.myshopify.com", 1001)).await
            }));
        }

        let mut first_deliveries = 0;
        for handle in handles {
            if handle.await.unwrap() == DeliveryStatus::FirstDelivery {
                first_deliveries += 1;
            }
        }

        assert_eq!(first_deliveries, 1);
    }
}

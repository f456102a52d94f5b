//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebhooksConfig;
use crate::dedupe::DedupeStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the dedupe store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebhooksConfig,
    dedupe: DedupeStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The dedupe store is sized from the configuration's capacity and TTL.
    #[must_use]
    pub fn new(config: WebhooksConfig) -> Self {
        let dedupe = DedupeStore::new(config.dedupe_capacity, config.dedupe_ttl);

        Self {
            inner: Arc::new(AppStateInner { config, dedupe }),
        }
    }

    /// Get a reference to the webhooks configuration.
    #[must_use]
    pub fn config(&self) -> &WebhooksConfig {
        &self.inner.config
    }

    /// Get a reference to the idempotency store.
    #[must_use]
    pub fn dedupe(&self) -> &DedupeStore {
        &self.inner.dedupe
    }
}

//! HTTP route handlers for the webhooks service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check (in main)
//! GET  /health/ready                        - Readiness check (in main)
//!
//! # Shopify webhooks
//! POST /api/shopify/webhooks/orders-create  - Order-creation receiver
//! ```

use axum::Router;

use crate::state::AppState;

pub mod webhooks;

/// Build the combined router for all route modules.
pub fn routes() -> Router<AppState> {
    Router::new().merge(webhooks::router())
}

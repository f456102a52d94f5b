//! Shopify webhook receiver.
//!
//! Every delivery runs one linear pipeline:
//!
//! ```text
//! Signature Verifier -> Payload Parser -> Idempotency Gate -> Handler
//! ```
//!
//! Verification must happen on the exact bytes received, so the handler
//! extracts the raw body and only parses JSON after the signature holds.
//! Duplicate deliveries are acknowledged with a success response without
//! re-running the order side effect - the upstream sender delivers
//! at-least-once and retries on non-2xx responses.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use printloom_core::{IdempotencyKey, ShopDomain};
use tracing::{debug, info, instrument, warn};

use crate::dedupe::DeliveryStatus;
use crate::error::WebhookError;
use crate::services;
use crate::shopify::{
    HMAC_HEADER, ORDERS_CREATE_TOPIC, OrderPayload, SHOP_DOMAIN_HEADER, TOPIC_HEADER,
    verify_signature,
};
use crate::state::AppState;

/// Create Shopify webhook routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/shopify/webhooks/orders-create", post(orders_create))
}

/// Handle an `orders/create` webhook delivery.
///
/// Responds 200 for both first deliveries ("Order Received") and duplicates
/// ("Already processed"); any non-2xx would make the sender redeliver.
#[instrument(skip(state, headers, body))]
async fn orders_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookError> {
    // Without the shared secret nothing can be authenticated
    let secret = state
        .config()
        .webhook_secret()
        .ok_or(WebhookError::SecretMissing)?;

    let signature = headers.get(HMAC_HEADER).and_then(|v| v.to_str().ok());
    verify_signature(secret, &body, signature)?;
    debug!("Webhook signature verified");

    // Only now is the body trusted enough to parse
    let order: OrderPayload = serde_json::from_slice(&body)?;

    // Topic is logged, not enforced: only the subscribed topic is delivered
    // here, and a mismatch still carried a valid signature
    let topic = headers
        .get(TOPIC_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("(none)");
    if topic != ORDERS_CREATE_TOPIC {
        warn!(%topic, "Unexpected topic on orders-create endpoint");
    }

    let shop = headers
        .get(SHOP_DOMAIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingShopDomain)?;
    let shop = ShopDomain::parse(shop)?;

    let key = IdempotencyKey::new(shop, order.id);

    match state.dedupe().record(key.clone()).await {
        DeliveryStatus::Duplicate => {
            info!(%key, %topic, "Duplicate webhook delivery acknowledged");
            Ok((StatusCode::OK, "Already processed"))
        }
        DeliveryStatus::FirstDelivery => {
            services::log_order_received(&key, topic, &order);
            Ok((StatusCode::OK, "Order Received"))
        }
    }
}

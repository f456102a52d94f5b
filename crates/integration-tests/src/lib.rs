//! Integration tests for Printloom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p printloom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `webhooks_orders_create` - The full webhook pipeline (verify, parse,
//!   dedupe, handle)
//! - `webhooks_health` - Liveness and readiness endpoints
//!
//! The tests drive the exact router the binary serves via
//! `tower::ServiceExt::oneshot` - no listener, no network, no external
//! services - so they are hermetic and safe to run in parallel.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use secrecy::SecretString;
use sha2::Sha256;

use printloom_webhooks::config::WebhooksConfig;
use printloom_webhooks::shopify::{
    HMAC_HEADER, ORDERS_CREATE_TOPIC, SHOP_DOMAIN_HEADER, TOPIC_HEADER,
};
use printloom_webhooks::state::AppState;

/// Secret shared between the test sender and the service under test.
pub const TEST_SECRET: &str = "integration-test-webhook-key";

/// The webhook receiver path.
pub const ORDERS_CREATE_PATH: &str = "/api/shopify/webhooks/orders-create";

/// Build a service router with an in-test configuration.
///
/// Pass `None` to simulate a deployment missing `SHOPIFY_WEBHOOK_SECRET`.
#[must_use]
pub fn test_app(secret: Option<&str>) -> Router {
    let config = WebhooksConfig {
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        webhook_secret: secret.map(SecretString::from),
        dedupe_capacity: 10_000,
        dedupe_ttl: Duration::from_secs(3600),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    printloom_webhooks::app(AppState::new(config))
}

/// Sign `body` the way the upstream platform does: base64 HMAC-SHA256.
#[must_use]
pub fn sign(secret: &str, body: &[u8]) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Build an `orders/create` delivery with the given signature header.
///
/// Pass `signature: None` to omit the header entirely.
#[must_use]
pub fn webhook_request(body: &[u8], signature: Option<&str>, shop: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(ORDERS_CREATE_PATH)
        .header("content-type", "application/json")
        .header(TOPIC_HEADER, ORDERS_CREATE_TOPIC);

    if let Some(signature) = signature {
        builder = builder.header(HMAC_HEADER, signature);
    }
    if let Some(shop) = shop {
        builder = builder.header(SHOP_DOMAIN_HEADER, shop);
    }

    builder
        .body(Body::from(body.to_vec()))
        .expect("request construction cannot fail")
}

/// A correctly signed delivery from `shop`.
#[must_use]
pub fn signed_request(body: &[u8], shop: &str) -> Request<Body> {
    let signature = sign(TEST_SECRET, body);
    webhook_request(body, Some(&signature), Some(shop))
}

/// Collect a response body into a string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection cannot fail")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response bodies are UTF-8")
}

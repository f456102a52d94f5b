//! End-to-end tests for the order-creation webhook pipeline.
//!
//! Each test sends real HTTP requests through the full router, so the
//! signature verifier, payload parser, idempotency gate, and handler are
//! all exercised together.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use tower::ServiceExt;

use printloom_integration_tests::{
    TEST_SECRET, body_text, sign, signed_request, test_app, webhook_request,
};

const SHOP: &str = "test.myshopify.com";

fn order_body(order_id: i64) -> Vec<u8> {
    serde_json::json!({
        "id": order_id,
        "name": format!("#{order_id}"),
        "total_price": "409.94",
        "currency": "USD",
        "customer": {"email": "bob.norman@mail.example.com"},
        "shipping_address": {
            "phone": "555-625-1199",
            "address1": "Chestnut Street 92",
            "city": "Louisville",
            "country": "United States"
        },
        "line_items": [
            {"sku": "TEE-BLK-M", "title": "Staple Tee", "quantity": 2, "price": "24.99"},
            {"sku": "MUG-11OZ", "title": "Classic Mug", "quantity": 1, "price": "12.50"}
        ]
    })
    .to_string()
    .into_bytes()
}

// =============================================================================
// Happy Path & Idempotency
// =============================================================================

#[tokio::test]
async fn test_valid_delivery_then_duplicate() {
    let app = test_app(Some(TEST_SECRET));
    let body = order_body(1001);

    let response = app
        .clone()
        .oneshot(signed_request(&body, SHOP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Order Received");

    // Identical second delivery is acknowledged, not reprocessed
    let response = app
        .clone()
        .oneshot(signed_request(&body, SHOP))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Already processed");

    // And every delivery after that
    let response = app.oneshot(signed_request(&body, SHOP)).await.unwrap();
    assert_eq!(body_text(response).await, "Already processed");
}

#[tokio::test]
async fn test_duplicate_detected_despite_payload_differences() {
    let app = test_app(Some(TEST_SECRET));

    let response = app
        .clone()
        .oneshot(signed_request(&order_body(1001), SHOP))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Order Received");

    // Same (shop, order id), different bytes - still a duplicate
    let changed = serde_json::json!({"id": 1001, "total_price": "999.99", "currency": "EUR"})
        .to_string()
        .into_bytes();
    let response = app.oneshot(signed_request(&changed, SHOP)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Already processed");
}

#[tokio::test]
async fn test_distinct_orders_both_received() {
    let app = test_app(Some(TEST_SECRET));

    for order_id in [1001, 1002] {
        let response = app
            .clone()
            .oneshot(signed_request(&order_body(order_id), SHOP))
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "Order Received");
    }
}

#[tokio::test]
async fn test_same_order_id_from_different_shops_both_received() {
    let app = test_app(Some(TEST_SECRET));
    let body = order_body(1001);

    let response = app
        .clone()
        .oneshot(signed_request(&body, "alpha.myshopify.com"))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Order Received");

    let response = app
        .oneshot(signed_request(&body, "beta.myshopify.com"))
        .await
        .unwrap();
    assert_eq!(body_text(response).await, "Order Received");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_simultaneous_duplicates_processed_once() {
    let app = test_app(Some(TEST_SECRET));
    let body = order_body(1001);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        let body = body.clone();
        handles.push(tokio::spawn(async move {
            let response = app.oneshot(signed_request(&body, SHOP)).await.unwrap();
            body_text(response).await
        }));
    }

    let mut received = 0;
    for handle in handles {
        if handle.await.unwrap() == "Order Received" {
            received += 1;
        }
    }

    assert_eq!(received, 1);
}

// =============================================================================
// Signature Verification
// =============================================================================

#[tokio::test]
async fn test_truncated_signature_rejected() {
    let app = test_app(Some(TEST_SECRET));
    let body = order_body(1001);

    let signature = sign(TEST_SECRET, &body);
    let truncated = &signature[..signature.len() - 1];

    let response = app
        .oneshot(webhook_request(&body, Some(truncated), Some(SHOP)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid HMAC");
}

#[tokio::test]
async fn test_signature_for_other_body_rejected() {
    let app = test_app(Some(TEST_SECRET));

    let signature = sign(TEST_SECRET, &order_body(1001));
    let response = app
        .oneshot(webhook_request(
            &order_body(1002),
            Some(&signature),
            Some(SHOP),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid HMAC");
}

#[tokio::test]
async fn test_missing_signature_header_rejected() {
    let app = test_app(Some(TEST_SECRET));

    let response = app
        .oneshot(webhook_request(&order_body(1001), None, Some(SHOP)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Invalid HMAC");
}

#[tokio::test]
async fn test_rejected_delivery_is_not_recorded() {
    let app = test_app(Some(TEST_SECRET));
    let body = order_body(1001);

    // A forged delivery must not poison the idempotency gate
    let response = app
        .clone()
        .oneshot(webhook_request(&body, Some("Zm9yZ2Vk"), Some(SHOP)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The genuine delivery afterwards is still a first delivery
    let response = app.oneshot(signed_request(&body, SHOP)).await.unwrap();
    assert_eq!(body_text(response).await, "Order Received");
}

// =============================================================================
// Payload Validation
// =============================================================================

#[tokio::test]
async fn test_malformed_json_with_valid_signature() {
    let app = test_app(Some(TEST_SECRET));
    let body = b"{not json at all";

    // Signature is over these exact bytes, so verification passes; only
    // parsing fails
    let response = app.oneshot(signed_request(body, SHOP)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid JSON");
}

#[tokio::test]
async fn test_json_without_order_id_rejected() {
    let app = test_app(Some(TEST_SECRET));
    let body = br##"{"name": "#1001"}"##;

    let response = app.oneshot(signed_request(body, SHOP)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Invalid JSON");
}

#[tokio::test]
async fn test_missing_shop_domain_header_rejected() {
    let app = test_app(Some(TEST_SECRET));
    let body = order_body(1001);

    let signature = sign(TEST_SECRET, &body);
    let response = app
        .oneshot(webhook_request(&body, Some(&signature), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing shop domain");
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[tokio::test]
async fn test_missing_secret_yields_500() {
    let app = test_app(None);
    let body = order_body(1001);

    // Even a correctly signed request cannot be verified without the secret
    let signature = sign(TEST_SECRET, &body);
    let response = app
        .oneshot(webhook_request(&body, Some(&signature), Some(SHOP)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Secret missing");
}

#[tokio::test]
async fn test_missing_secret_takes_precedence_over_bad_signature() {
    let app = test_app(None);

    let response = app
        .oneshot(webhook_request(&order_body(1001), None, Some(SHOP)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Secret missing");
}

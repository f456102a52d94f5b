//! Printloom Webhooks library.
//!
//! This crate provides the webhook intake service as a library, allowing it
//! to be tested and reused. The binary in `main.rs` wires [`app`] to a
//! listener; integration tests drive the same router directly.
//!
//! # Security
//!
//! Webhook deliveries authenticate via HMAC-SHA256 over the raw request
//! body. There are no sessions and no user accounts in this service - a
//! request either carries a valid signature or it is rejected.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

pub mod config;
pub mod dedupe;
pub mod error;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

use state::AppState;

/// Build the service router: health endpoints, webhook routes, and request
/// tracing.
///
/// Kept separate from `main` so tests can exercise the exact router the
/// binary serves.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the webhook secret is configured.
/// The receiver itself still answers each delivery (with a 500) either way;
/// this only keeps an unconfigured instance out of load-balancer rotation.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.config().webhook_secret().is_some() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

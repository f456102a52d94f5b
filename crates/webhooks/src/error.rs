//! Unified error handling for the webhooks service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::shopify::SignatureError;

/// Application-level error type for webhook intake.
///
/// A duplicate delivery is NOT an error: the receiver acknowledges it with
/// a success response, so it never appears here.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The shared webhook secret is not configured.
    ///
    /// Surfaced per-request rather than at startup: the upstream sender
    /// retries failed deliveries, so nothing is lost while an operator
    /// fixes the environment.
    #[error("webhook secret is not configured")]
    SecretMissing,

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// The verified body is not valid JSON for the expected payload.
    #[error("payload rejected: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The `x-shopify-shop-domain` header is absent.
    #[error("missing shop domain header")]
    MissingShopDomain,

    /// The `x-shopify-shop-domain` header is not a usable domain.
    #[error("invalid shop domain header: {0}")]
    InvalidShopDomain(#[from] printloom_core::ShopDomainError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Configuration errors are on us, not the sender - track them
        if matches!(self, Self::SecretMissing) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Webhook request failed on server configuration"
            );
        } else {
            tracing::warn!(error = %self, "Webhook request rejected");
        }

        let status = match &self {
            Self::SecretMissing => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidPayload(_) | Self::MissingShopDomain | Self::InvalidShopDomain(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        // Fixed response texts; the sender's retry logic keys off the status,
        // and error details stay in our logs rather than on the wire.
        let message = match &self {
            Self::SecretMissing => "Secret missing",
            Self::InvalidSignature(_) => "Invalid HMAC",
            Self::InvalidPayload(_) => "Invalid JSON",
            Self::MissingShopDomain => "Missing shop domain",
            Self::InvalidShopDomain(_) => "Invalid shop domain",
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: WebhookError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_webhook_error_display() {
        let err = WebhookError::SecretMissing;
        assert_eq!(err.to_string(), "webhook secret is not configured");

        let err = WebhookError::MissingShopDomain;
        assert_eq!(err.to_string(), "missing shop domain header");
    }

    #[test]
    fn test_webhook_error_status_codes() {
        assert_eq!(
            get_status(WebhookError::SecretMissing),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(WebhookError::InvalidSignature(SignatureError::Mismatch)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(WebhookError::MissingShopDomain),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_parse_failure_maps_to_bad_request() {
        let json_err =
            serde_json::from_str::<serde_json::Value>("{not json").expect_err("must fail");
        assert_eq!(
            get_status(WebhookError::InvalidPayload(json_err)),
            StatusCode::BAD_REQUEST
        );
    }
}

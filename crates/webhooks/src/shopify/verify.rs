//! Webhook signature verification.
//!
//! Shopify computes HMAC-SHA256 over the raw request body with the app's
//! shared secret and sends it base64-encoded in `x-shopify-hmac-sha256`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a delivery fails signature verification.
///
/// All variants are terminal: the request is rejected as unauthenticated
/// and no further processing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The signature header is absent.
    #[error("signature header missing")]
    MissingHeader,
    /// The signature header is not valid base64.
    #[error("signature header is not valid base64")]
    MalformedHeader,
    /// The decoded signature is not the size of a SHA-256 digest.
    #[error("signature length mismatch")]
    LengthMismatch,
    /// The signature does not match the computed digest.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verify the webhook signature over the exact body bytes received.
///
/// The length check runs before any byte comparison; the byte comparison
/// itself is constant-time to avoid leaking how much of a forged signature
/// was correct.
///
/// # Errors
///
/// Returns `SignatureError` if the header is missing, undecodable, the
/// wrong length, or does not match the digest computed with `secret`.
pub fn verify_signature(
    secret: &SecretString,
    body: &[u8],
    provided: Option<&str>,
) -> Result<(), SignatureError> {
    let provided = provided.ok_or(SignatureError::MissingHeader)?;

    let provided = BASE64
        .decode(provided)
        .map_err(|_| SignatureError::MalformedHeader)?;

    // HMAC accepts keys of any length, so construction cannot fail here
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
        return Err(SignatureError::Mismatch);
    };
    mac.update(body);
    let computed = mac.finalize().into_bytes();

    if provided.len() != computed.len() {
        return Err(SignatureError::LengthMismatch);
    }

    if !constant_time_compare(&provided, &computed) {
        return Err(SignatureError::Mismatch);
    }

    Ok(())
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// Callers must have already established equal lengths.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

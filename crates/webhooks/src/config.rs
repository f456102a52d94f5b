//! Webhooks configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPIFY_WEBHOOK_SECRET` - Shared secret for webhook HMAC verification.
//!   Loaded lazily: a missing secret does NOT fail startup, it fails each
//!   webhook request with a 500 until the secret is provided.
//! - `WEBHOOKS_HOST` - Bind address (default: 127.0.0.1)
//! - `WEBHOOKS_PORT` - Listen port (default: 3002)
//! - `WEBHOOKS_DEDUPE_CAPACITY` - Max tracked idempotency keys (default: 100000)
//! - `WEBHOOKS_DEDUPE_TTL_SECS` - Idempotency key lifetime (default: 86400)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Webhooks application configuration.
#[derive(Clone)]
pub struct WebhooksConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shared secret for webhook signature verification.
    ///
    /// `None` means the secret was not set at startup; requests are rejected
    /// with a configuration error until it is.
    pub webhook_secret: Option<SecretString>,
    /// Maximum number of idempotency keys held by the dedupe store
    pub dedupe_capacity: u64,
    /// Lifetime of an idempotency key before the store may evict it
    pub dedupe_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl std::fmt::Debug for WebhooksConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhooksConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("dedupe_capacity", &self.dedupe_capacity)
            .field("dedupe_ttl", &self.dedupe_ttl)
            .field("sentry_dsn", &self.sentry_dsn)
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .field("sentry_traces_sample_rate", &self.sentry_traces_sample_rate)
            .finish()
    }
}

impl WebhooksConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse. A missing
    /// `SHOPIFY_WEBHOOK_SECRET` is not an error here: the upstream sender
    /// retries deliveries, so the service starts and rejects requests
    /// individually until the secret appears.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WEBHOOKS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEBHOOKS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WEBHOOKS_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WEBHOOKS_PORT".to_string(), e.to_string()))?;

        let webhook_secret = get_optional_env("SHOPIFY_WEBHOOK_SECRET").map(|value| {
            // Weak secrets warn instead of erroring: absence is already a
            // per-request condition, so presence checks cannot be fatal.
            if let Err(e) = validate_secret_strength(&value, "SHOPIFY_WEBHOOK_SECRET") {
                tracing::warn!("SHOPIFY_WEBHOOK_SECRET validation warning: {e}");
            }
            SecretString::from(value)
        });

        let dedupe_capacity = get_env_or_default("WEBHOOKS_DEDUPE_CAPACITY", "100000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WEBHOOKS_DEDUPE_CAPACITY".to_string(), e.to_string())
            })?;
        let dedupe_ttl_secs = get_env_or_default("WEBHOOKS_DEDUPE_TTL_SECS", "86400")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WEBHOOKS_DEDUPE_TTL_SECS".to_string(), e.to_string())
            })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            webhook_secret,
            dedupe_capacity,
            dedupe_ttl: Duration::from_secs(dedupe_ttl_secs),
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the webhook secret, if configured.
    #[must_use]
    pub const fn webhook_secret(&self) -> Option<&SecretString> {
        self.webhook_secret.as_ref()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

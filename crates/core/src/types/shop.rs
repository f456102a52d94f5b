//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum ShopDomainError {
    /// The input string is empty.
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[a-z0-9.-]`.
    #[error("shop domain contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// The input has no dot, so it cannot be a domain.
    #[error("shop domain must contain a dot")]
    MissingDot,
}

/// A shop's domain as reported by the `x-shopify-shop-domain` header
/// (e.g., `test.myshopify.com`).
///
/// ## Constraints
///
/// - Length: 1-255 characters (DNS limit)
/// - Lowercase ASCII letters, digits, hyphens, and dots only
///   (input is lowercased before validation)
/// - Must contain at least one dot
///
/// ## Examples
///
/// ```
/// use printloom_core::ShopDomain;
///
/// assert!(ShopDomain::parse("test.myshopify.com").is_ok());
/// assert!(ShopDomain::parse("Test.MyShopify.com").is_ok()); // lowercased
///
/// assert!(ShopDomain::parse("").is_err());          // empty
/// assert!(ShopDomain::parse("no-dot").is_err());    // not a domain
/// assert!(ShopDomain::parse("bad domain.com").is_err()); // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a domain name (RFC 1035).
    pub const MAX_LENGTH: usize = 255;

    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 255 characters
    /// - Contains characters outside `[a-z0-9.-]` after lowercasing
    /// - Does not contain a dot
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        if s.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let lowered = s.to_ascii_lowercase();

        if let Some(c) = lowered
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '.' || *c == '-'))
        {
            return Err(ShopDomainError::InvalidCharacter(c));
        }

        if !lowered.contains('.') {
            return Err(ShopDomainError::MissingDot);
        }

        Ok(Self(lowered))
    }

    /// Returns the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ShopDomain` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ShopDomain {
    type Err = ShopDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Core types for Printloom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod idempotency;
pub mod price;
pub mod shop;

pub use id::*;
pub use idempotency::IdempotencyKey;
pub use price::{CurrencyCode, CurrencyCodeError, Price};
pub use shop::{ShopDomain, ShopDomainError};

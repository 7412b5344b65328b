//! # Validation Errors
//!
//! Errors raised by the validating constructors in this crate. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations
//! and carry the offending input for diagnostics.

use thiserror::Error;

/// Error from a validating constructor in `fairwork-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Wallet address is not `0x` followed by 40 hex digits.
    #[error("invalid wallet address: {0:?}")]
    InvalidAddress(String),

    /// Monetary amount string could not be parsed as a non-negative decimal
    /// with at most six fractional digits.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Content reference is empty or contains whitespace.
    #[error("invalid content reference: {0:?}")]
    InvalidContentRef(String),

    /// Timestamp is not RFC 3339 with a `Z` suffix.
    #[error("invalid timestamp (UTC with Z suffix required): {0:?}")]
    InvalidTimestamp(String),

    /// AI analysis record failed field validation.
    #[error("invalid AI analysis: {0}")]
    InvalidAnalysis(String),
}

//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers in the FairWork domain. These
//! prevent accidental identifier confusion — you cannot pass a `JobId`
//! where a `DisputeId` is expected.
//!
//! ## Security Invariant
//!
//! Wallet addresses are normalized to lowercase exactly once, at
//! construction. Two `Address` values compare equal iff they name the same
//! wallet, regardless of the mixed-case checksum form the caller supplied.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Unique identifier for a job under escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

/// Unique identifier for a dispute proceeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId(pub Uuid);

impl JobId {
    /// Generate a new random job identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl DisputeId {
    /// Generate a new random dispute identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for DisputeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "job:{}", self.0)
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispute:{}", self.0)
    }
}

/// A wallet address in canonical (lowercase) form.
///
/// Constructed via [`Address::new`], which validates the `0x` + 40 hex digit
/// shape and lowercases the hex portion. All comparisons on `Address` are
/// comparisons of canonical tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and canonicalize a wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] unless the input is `0x`
    /// followed by exactly 40 hexadecimal digits (any case).
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| ValidationError::InvalidAddress(raw.clone()))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidAddress(raw));
        }
        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// The canonical lowercase form, e.g. `0xabc…def`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Address {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

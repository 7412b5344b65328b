//! # Monetary Amounts — Integer Micro-Units
//!
//! [`UsdAmount`] stores escrow amounts as integer micro-units (six
//! fractional digits, matching on-chain USDC precision). There is no
//! floating-point path anywhere: construction is from integer micro-units
//! or from a decimal string, and both reject anything that would lose
//! precision.
//!
//! ## Security Invariant
//!
//! Financial amounts must never be represented as floating-point numbers.
//! A `UsdAmount` is always an exact integer count of 10⁻⁶ units.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of fractional digits in a micro-unit amount.
const DECIMALS: u32 = 6;

/// Micro-units per whole unit (10⁶).
const SCALE: i64 = 1_000_000;

/// An escrow amount in integer micro-units (6 decimals).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct UsdAmount(i64);

impl UsdAmount {
    /// Construct from a raw micro-unit count.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    /// The raw micro-unit count.
    pub const fn micros(&self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly positive.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Parse a decimal string such as `"50"`, `"50.00"`, or `"0.000001"`.
    ///
    /// At most six fractional digits are accepted; a seventh would silently
    /// lose precision and is rejected instead.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] for empty input, negative
    /// values, non-digit characters, multiple decimal points, or more than
    /// six fractional digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let err = || ValidationError::InvalidAmount(s.to_string());
        if s.is_empty() || s.starts_with('-') {
            return Err(err());
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(err());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
            || frac.len() > DECIMALS as usize
        {
            return Err(err());
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };
        // Right-pad the fraction to six digits: "5" → 500000 micros.
        let frac_micros: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<6}");
            padded.parse().map_err(|_| err())?
        };
        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(frac_micros))
            .map(Self)
            .ok_or_else(err)
    }
}

impl std::fmt::Display for UsdAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.0 / SCALE;
        let frac = (self.0 % SCALE).unsigned_abs();
        write!(f, "{whole}.{frac:06}")
    }
}

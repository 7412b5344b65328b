//! # fairwork-core — Foundational Types for the FairWork Engine
//!
//! This crate is the leaf of the workspace dependency DAG. It defines the
//! type-system primitives every other crate builds on:
//!
//! 1. **Newtype wrappers for domain identifiers.** [`JobId`], [`DisputeId`],
//!    and [`Address`] — no bare strings or UUIDs cross a crate boundary.
//!
//! 2. **Canonical wallet addresses.** [`Address::new`] validates and
//!    lowercases once at ingestion; every later comparison is a plain
//!    equality check on the canonical form. No ad-hoc re-normalization.
//!
//! 3. **Integer money.** [`UsdAmount`] stores micro-units (6 fractional
//!    digits, matching on-chain USDC precision). Floats are rejected at the
//!    parsing boundary and cannot be constructed.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] enforces UTC with `Z` suffix at
//!    seconds precision.
//!
//! 5. **Validated advisory records.** [`AiAnalysis::new`] is the only way to
//!    build an analysis record — a record missing a field or carrying an
//!    out-of-range confidence cannot exist.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fairwork-*` crates.
//! - No `unsafe`, no `panic!()`/`.unwrap()` outside tests.
//! - All public types derive `Debug` and `Clone` and implement
//!   `Serialize`/`Deserialize`.

pub mod amount;
pub mod analysis;
pub mod content;
pub mod error;
pub mod identity;
pub mod temporal;

pub use amount::UsdAmount;
pub use analysis::{AiAnalysis, Recommendation};
pub use content::ContentRef;
pub use error::ValidationError;
pub use identity::{Address, DisputeId, JobId};
pub use temporal::Timestamp;

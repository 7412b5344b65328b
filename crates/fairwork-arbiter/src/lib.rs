//! # fairwork-arbiter — AI Arbitration Router
//!
//! Produces advisory dispute analyses from a chain of OpenAI-compatible
//! providers:
//!
//! - **Prompt** ([`prompt`]): deterministic case prompt construction.
//!
//! - **Provider** ([`provider`]): one HTTP client per configured backend,
//!   with credentials and per-request timeouts.
//!
//! - **Validate** ([`validate`]): fence stripping and strict schema
//!   validation of provider responses.
//!
//! - **Router** ([`router`]): ordered fallback over the provider list.
//!
//! The router owns provider identity and credentials; callers hand it a
//! [`CaseEvidence`] bundle and get back a validated
//! [`fairwork_core::AiAnalysis`] or a typed failure.

pub mod error;
pub mod prompt;
pub mod provider;
pub mod router;
pub mod validate;

pub use error::{ArbiterError, ProviderFailure};
pub use prompt::{build_prompt, CaseEvidence};
pub use provider::ProviderConfig;
pub use router::ArbitrationRouter;

//! # Arbiter Errors
//!
//! Failures from the arbitration router. Per-provider failures are not
//! surfaced individually; the router advances through its list and reports
//! [`ArbiterError::Unavailable`] only when every provider has failed,
//! carrying each attempt's reason for diagnostics.

use thiserror::Error;

/// One failed provider attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// The provider's configured name.
    pub provider: String,
    /// Why the attempt was discarded.
    pub reason: String,
}

impl std::fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.provider, self.reason)
    }
}

/// Error from the arbitration router.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbiterError {
    /// The router was built with an unusable configuration.
    #[error("arbiter not configured: {reason}")]
    NotConfigured {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// Every configured provider failed. The dispute stays where it was.
    #[error("all {} arbitration providers failed", attempts.len())]
    Unavailable {
        /// One entry per provider, in attempt order.
        attempts: Vec<ProviderFailure>,
    },
}

//! # Engine Errors
//!
//! Structured error hierarchy for the lifecycle engine. Every rejected
//! operation names what was attempted and why it was refused, so the HTTP
//! layer can map each variant to a status code without string matching.

use thiserror::Error;

use fairwork_core::{Address, DisputeId, JobId, ValidationError};

/// Error from a lifecycle engine operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A field failed validation at a crate boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Input was well-formed but semantically invalid for the operation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The entity is not in a state that permits the attempted action.
    #[error("cannot {action}: job or dispute is {current}, requires {required}")]
    IllegalTransition {
        /// The action that was attempted.
        action: &'static str,
        /// The entity's current status, canonical form.
        current: &'static str,
        /// The status the action requires, canonical form.
        required: &'static str,
    },

    /// The acting address is not permitted to perform this action.
    #[error("{actor} is not authorized to {action}")]
    Unauthorized {
        /// The action that was attempted.
        action: &'static str,
        /// The acting wallet, canonical form.
        actor: Address,
    },

    /// No job with the given identifier.
    #[error("{0} not found")]
    JobNotFound(JobId),

    /// No dispute with the given identifier.
    #[error("{0} not found")]
    DisputeNotFound(DisputeId),

    /// A dispute has already been raised for this job.
    #[error("{0} already has an open dispute")]
    DisputeAlreadyOpen(JobId),

    /// Jurors were already assigned to this dispute. Assignment is one-time.
    #[error("{0} already has jurors assigned")]
    JurorsAlreadyAssigned(DisputeId),

    /// The voter is not on this dispute's juror panel.
    #[error("{actor} is not a juror on {dispute_id}")]
    NotAJuror {
        /// The dispute being voted on.
        dispute_id: DisputeId,
        /// The address that attempted to vote.
        actor: Address,
    },

    /// This juror has already cast a vote on this dispute.
    #[error("{juror} has already voted on {dispute_id}")]
    DuplicateVote {
        /// The dispute being voted on.
        dispute_id: DisputeId,
        /// The juror that attempted a second vote.
        juror: Address,
    },

    /// The dispute has already reached a final outcome.
    #[error("{0} is already resolved")]
    DisputeAlreadyResolved(DisputeId),

    /// The juror pool could not produce a panel.
    #[error("juror selection failed: {0}")]
    JurorSelection(String),
}

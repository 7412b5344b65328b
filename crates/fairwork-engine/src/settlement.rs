//! # Settlement Correlation
//!
//! The engine never moves funds. An external settlement collaborator (the
//! escrow contract plus whatever relays its receipts) does, and reports
//! back with [`SettlementEvent`] confirmations. Each creation-time event
//! carries a client-generated correlation token, which is how an opaque
//! engine identifier gets bound to its on-chain counterpart exactly once.
//!
//! Confirmation delivery is at-least-once and unordered, so ingest treats
//! duplicates and out-of-order arrivals as no-ops. The only hard failure is
//! a token rebinding to a *different* on-chain id, which indicates a relay
//! bug and is surfaced instead of absorbed.
//!
//! In the other direction, escrow-releasing transitions (approval, dispute
//! resolution) emit a [`Payout`] instruction for the collaborator to
//! execute.

use serde::{Deserialize, Serialize};

use fairwork_core::{Address, DisputeId, JobId, UsdAmount};

/// A confirmation from the settlement collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementEvent {
    /// The escrow contract created the job and assigned its on-chain id.
    JobCreated {
        /// Correlation token supplied when the job was posted.
        correlation: String,
        /// The on-chain job identifier.
        contract_job_id: u64,
    },
    /// The escrow contract opened the dispute and assigned its on-chain id.
    DisputeOpened {
        /// Correlation token supplied when the dispute was raised.
        correlation: String,
        /// The on-chain dispute identifier.
        contract_dispute_id: u64,
    },
    /// Escrowed funds were released on chain.
    FundsReleased {
        /// The on-chain job identifier whose escrow was released.
        contract_job_id: u64,
    },
}

/// Outcome of ingesting a settlement event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementAck {
    /// The on-chain id was bound to its engine record.
    Bound,
    /// Redelivery of an already-applied binding. No-op.
    Duplicate,
    /// The correlation token is unknown here. No-op.
    Ignored,
    /// Informational event recorded with no state change.
    Acknowledged,
}

impl SettlementAck {
    /// The canonical string name of this acknowledgement.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bound => "BOUND",
            Self::Duplicate => "DUPLICATE",
            Self::Ignored => "IGNORED",
            Self::Acknowledged => "ACKNOWLEDGED",
        }
    }
}

/// What a correlation token points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CorrelationTarget {
    Job(JobId),
    Dispute(DisputeId),
}

/// An instruction for the settlement collaborator to move escrowed funds.
///
/// Emitted by approval and by dispute resolution. The engine records
/// nothing further about it; execution and its confirmation are the
/// collaborator's problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// The job whose escrow is being released.
    pub job_id: JobId,
    /// The full escrowed amount.
    pub amount: UsdAmount,
    /// The wallet the funds go to.
    pub payee: Address,
}

//! # fairwork-engine — Job & Dispute Lifecycle
//!
//! The authoritative lifecycle engine for escrowed jobs and their disputes:
//!
//! - **Job** ([`job`]): the job state machine from posting through
//!   completion or dispute, with per-actor authorization.
//!
//! - **Dispute** ([`dispute`]): the dispute state machine from filing
//!   through AI analysis, jury voting, and resolution.
//!
//! - **Consensus** ([`consensus`]): majority-of-three vote counting with
//!   early finalization.
//!
//! - **Marketplace** ([`marketplace`]): the concurrent coordinator that
//!   owns all records and keeps cross-entity invariants atomic.
//!
//! - **Settlement** ([`settlement`]): correlation of engine records with
//!   their on-chain counterparts, and payout instructions.
//!
//! - **Jurors** ([`jurors`]): the juror pool collaborator seam.
//!
//! The engine holds no provider credentials and moves no funds; AI
//! arbitration and escrow execution live behind collaborator seams.

pub mod consensus;
pub mod dispute;
pub mod error;
pub mod job;
pub mod jurors;
pub mod marketplace;
pub mod settlement;

// Re-export primary types for ergonomic imports.

pub use error::EngineError;

pub use job::{Job, JobStatus, NewJob};

pub use dispute::{
    Dispute, DisputeOutcome, DisputeStatus, Evidence, PartyRole, Vote, VoteDecision,
};

pub use consensus::{cast_vote, majority, tally, MAJORITY};

pub use marketplace::{Marketplace, VoteReceipt};

pub use settlement::{Payout, SettlementAck, SettlementEvent};

pub use jurors::{FixedPool, JurorPool, PANEL_SIZE};

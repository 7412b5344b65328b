//! # Job Lifecycle
//!
//! Manages an escrowed job from posting through completion or dispute,
//! via the state machine:
//!
//! ```text
//! Open ──accept()──▶ Accepted ──submit_deliverable()──▶ Submitted
//!                                                          │
//!                                          ┌───────────────┤
//!                                          │               │
//!                                    approve()       mark_disputed()
//!                                          │               │
//!                                          ▼               ▼
//!                                      Approved         Disputed
//!                                                          │
//!                                                     finalize()
//!                                                          │
//!                                                          ▼
//!                                                      Resolved
//! ```
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! Jobs are stored in a shared map, serialized over HTTP, and mutated from
//! handlers where the state is not known at compile time. A validated enum
//! with per-transition methods keeps the same call-site guarantees as
//! typestate (each transition takes exactly the inputs it needs) without an
//! intermediate dynamic-state layer for serde.
//!
//! ## Idempotent Repeats
//!
//! Wallet frontends retry on flaky connections. Re-delivering a transition
//! that has already been applied, by the same actor, is a no-op success.
//! Any other status mismatch is [`EngineError::IllegalTransition`].

use serde::{Deserialize, Serialize};

use fairwork_core::{Address, ContentRef, JobId, Timestamp, UsdAmount};

use crate::error::EngineError;

/// The lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Posted by a client; escrow funded; awaiting a freelancer.
    Open,
    /// A freelancer has taken the job and is working.
    Accepted,
    /// The freelancer has submitted a deliverable; awaiting client review.
    Submitted,
    /// The client approved the deliverable. Terminal state.
    Approved,
    /// A dispute has been raised over the deliverable.
    Disputed,
    /// The dispute reached a final outcome. Terminal state.
    Resolved,
}

impl JobStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Accepted => "ACCEPTED",
            Self::Submitted => "SUBMITTED",
            Self::Approved => "APPROVED",
            Self::Disputed => "DISPUTED",
            Self::Resolved => "RESOLVED",
        }
    }

    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Resolved)
    }

    /// Valid target statuses from this status.
    pub fn valid_transitions(&self) -> &'static [JobStatus] {
        match self {
            Self::Open => &[Self::Accepted],
            Self::Accepted => &[Self::Submitted],
            Self::Submitted => &[Self::Approved, Self::Disputed],
            Self::Disputed => &[Self::Resolved],
            Self::Approved | Self::Resolved => &[],
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for posting a new job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    /// Short title shown in listings.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Content-address of the full job brief.
    pub description_ref: ContentRef,
    /// Escrowed amount. Must be strictly positive.
    pub amount: UsdAmount,
    /// Delivery deadline. Must be strictly in the future at creation.
    pub deadline: Timestamp,
    /// The posting client's wallet.
    pub client: Address,
}

/// A job under escrow, managed through the job lifecycle.
///
/// Created via [`Job::create`], then advanced through statuses using
/// transition methods. Each method checks both the current status and the
/// acting address before mutating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// On-chain job identifier, bound once via settlement confirmation.
    pub contract_job_id: Option<u64>,
    /// Short title shown in listings.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Content-address of the full job brief.
    pub description_ref: ContentRef,
    /// Escrowed amount.
    pub amount: UsdAmount,
    /// Delivery deadline.
    pub deadline: Timestamp,
    /// The posting client's wallet.
    pub client: Address,
    /// The accepting freelancer's wallet. `None` until accepted.
    pub freelancer: Option<Address>,
    /// Content-address of the submitted deliverable. `None` until submitted.
    pub deliverable_ref: Option<ContentRef>,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// When the job was posted (UTC).
    pub created_at: Timestamp,
    /// When the job was last updated (UTC).
    pub updated_at: Timestamp,
}

impl Job {
    /// Post a new job, creating it in the [`Open`](JobStatus::Open) status.
    ///
    /// This is the only constructor for `Job`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the title or description is
    /// blank, the amount is not strictly positive, or the deadline is not
    /// strictly in the future.
    pub fn create(new: NewJob) -> Result<Self, EngineError> {
        if new.title.trim().is_empty() {
            return Err(EngineError::InvalidInput("title must be non-empty".into()));
        }
        if new.description.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "description must be non-empty".into(),
            ));
        }
        if !new.amount.is_positive() {
            return Err(EngineError::InvalidInput(
                "amount must be strictly positive".into(),
            ));
        }
        let now = Timestamp::now();
        if new.deadline <= now {
            return Err(EngineError::InvalidInput(
                "deadline must be strictly in the future".into(),
            ));
        }
        Ok(Self {
            id: JobId::new(),
            contract_job_id: None,
            title: new.title,
            description: new.description,
            description_ref: new.description_ref,
            amount: new.amount,
            deadline: new.deadline,
            client: new.client,
            freelancer: None,
            deliverable_ref: None,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }

    /// Transition Open → Accepted.
    ///
    /// The acting freelancer takes the job. The client cannot accept their
    /// own posting.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] if the actor is the posting
    /// client, or [`EngineError::IllegalTransition`] if the job is not Open
    /// (unless this exact acceptance was already applied).
    pub fn accept(&mut self, actor: Address) -> Result<(), EngineError> {
        if self.status == JobStatus::Accepted && self.freelancer.as_ref() == Some(&actor) {
            return Ok(());
        }
        if actor == self.client {
            return Err(EngineError::Unauthorized {
                action: "accept own job",
                actor,
            });
        }
        self.require_status("accept", JobStatus::Open)?;
        self.freelancer = Some(actor);
        self.advance(JobStatus::Accepted);
        Ok(())
    }

    /// Transition Accepted → Submitted.
    ///
    /// Only the accepting freelancer may submit. The deliverable reference
    /// is opaque; the engine never inspects content.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] if the actor is not the
    /// freelancer, or [`EngineError::IllegalTransition`] if the job is not
    /// Accepted (unless already submitted by this actor).
    pub fn submit_deliverable(
        &mut self,
        actor: Address,
        deliverable_ref: ContentRef,
    ) -> Result<(), EngineError> {
        if self.status == JobStatus::Submitted && self.freelancer.as_ref() == Some(&actor) {
            return Ok(());
        }
        if self.freelancer.as_ref() != Some(&actor) {
            return Err(EngineError::Unauthorized {
                action: "submit deliverable",
                actor,
            });
        }
        self.require_status("submit deliverable", JobStatus::Accepted)?;
        self.deliverable_ref = Some(deliverable_ref);
        self.advance(JobStatus::Submitted);
        Ok(())
    }

    /// Transition Submitted → Approved. Terminal.
    ///
    /// Only the posting client may approve. Approval releases escrow to the
    /// freelancer; the caller is responsible for emitting the payout
    /// instruction.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] if the actor is not the client,
    /// or [`EngineError::IllegalTransition`] if the job is not Submitted
    /// (unless already approved by this actor).
    pub fn approve(&mut self, actor: Address) -> Result<(), EngineError> {
        if self.status == JobStatus::Approved && actor == self.client {
            return Ok(());
        }
        if actor != self.client {
            return Err(EngineError::Unauthorized {
                action: "approve job",
                actor,
            });
        }
        self.require_status("approve job", JobStatus::Submitted)?;
        self.advance(JobStatus::Approved);
        Ok(())
    }

    /// Transition Submitted → Disputed.
    ///
    /// Either party may dispute a submitted deliverable. Driven by the
    /// dispute side of the engine; callers go through the marketplace, which
    /// creates the dispute record in the same critical section.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unauthorized`] if the actor is neither party,
    /// or [`EngineError::IllegalTransition`] if the job is not Submitted.
    pub fn mark_disputed(&mut self, actor: &Address) -> Result<(), EngineError> {
        if !self.is_party(actor) {
            return Err(EngineError::Unauthorized {
                action: "raise dispute",
                actor: actor.clone(),
            });
        }
        self.require_status("raise dispute", JobStatus::Submitted)?;
        self.advance(JobStatus::Disputed);
        Ok(())
    }

    /// Transition Disputed → Resolved. Terminal.
    ///
    /// Driven by jury consensus; never invoked directly by a party. The
    /// outcome itself lives on the dispute record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IllegalTransition`] if the job is not Disputed.
    pub fn finalize(&mut self) -> Result<(), EngineError> {
        self.require_status("finalize job", JobStatus::Disputed)?;
        self.advance(JobStatus::Resolved);
        Ok(())
    }

    /// Whether the address is the client or the accepted freelancer.
    pub fn is_party(&self, addr: &Address) -> bool {
        *addr == self.client || self.freelancer.as_ref() == Some(addr)
    }

    /// Check that the job is in the expected status for a transition.
    fn require_status(
        &self,
        action: &'static str,
        required: JobStatus,
    ) -> Result<(), EngineError> {
        if self.status != required {
            return Err(EngineError::IllegalTransition {
                action,
                current: self.status.as_str(),
                required: required.as_str(),
            });
        }
        Ok(())
    }

    fn advance(&mut self, to: JobStatus) {
        self.status = to;
        self.updated_at = Timestamp::now();
    }
}

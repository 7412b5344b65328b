//! # Marketplace Coordinator
//!
//! [`Marketplace`] owns the authoritative in-memory job and dispute records
//! and serializes every mutation through one `parking_lot::RwLock`. All
//! transitions are check-then-write under the write lock, which gives two
//! guarantees without further machinery:
//!
//! - Racing writers resolve cleanly: two concurrent accepts of one Open job
//!   yield exactly one success, the loser gets the transition error.
//! - Cross-entity invariants hold at every observable instant: a job moves
//!   to Disputed in the same critical section that creates its dispute
//!   record, and a dispute resolves in the same critical section that
//!   finalizes its job. No reader can observe a half-applied pair.
//!
//! Arbitration provider calls happen entirely outside the lock. The caller
//! snapshots the case, runs the (slow, fallible) analysis, then applies the
//! result through [`Marketplace::attach_analysis`], which revalidates the
//! dispute's current status. A response arriving after jurors were assigned
//! is rejected by that check, never blindly applied.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::info;

use fairwork_core::{Address, AiAnalysis, ContentRef, DisputeId, JobId, Timestamp};

use crate::dispute::{Dispute, DisputeOutcome, DisputeStatus, Evidence, PartyRole, VoteDecision};
use crate::error::EngineError;
use crate::job::{Job, JobStatus, NewJob};
use crate::jurors::JurorPool;
use crate::settlement::{CorrelationTarget, Payout, SettlementAck, SettlementEvent};
use crate::{consensus, jurors::PANEL_SIZE};

/// Result of a vote that may have finalized the dispute.
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    /// The dispute after the vote.
    pub dispute: Dispute,
    /// Present when this vote completed the majority and released escrow.
    pub payout: Option<Payout>,
}

#[derive(Default)]
struct MarketplaceInner {
    jobs: HashMap<JobId, Job>,
    disputes: HashMap<DisputeId, Dispute>,
    dispute_by_job: HashMap<JobId, DisputeId>,
    correlations: HashMap<String, CorrelationTarget>,
}

impl MarketplaceInner {
    fn job_mut(&mut self, id: &JobId) -> Result<&mut Job, EngineError> {
        self.jobs.get_mut(id).ok_or(EngineError::JobNotFound(*id))
    }

    fn dispute_mut(&mut self, id: &DisputeId) -> Result<&mut Dispute, EngineError> {
        self.disputes
            .get_mut(id)
            .ok_or(EngineError::DisputeNotFound(*id))
    }

    /// Validate a correlation token without registering it. Lets callers
    /// run all checks before any write, keeping failed operations free of
    /// side effects.
    fn check_correlation(&self, token: Option<&String>) -> Result<(), EngineError> {
        let Some(token) = token else { return Ok(()) };
        if token.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "correlation token must be non-empty".into(),
            ));
        }
        if self.correlations.contains_key(token) {
            return Err(EngineError::InvalidInput(format!(
                "correlation token {token:?} is already in use"
            )));
        }
        Ok(())
    }

    fn register_correlation(&mut self, token: Option<String>, target: CorrelationTarget) {
        if let Some(token) = token {
            self.correlations.insert(token, target);
        }
    }
}

/// The concurrent marketplace state.
///
/// Cheap to share: wrap in an `Arc` and clone the handle. All methods take
/// `&self`.
#[derive(Default)]
pub struct Marketplace {
    inner: RwLock<MarketplaceInner>,
}

impl Marketplace {
    /// An empty marketplace.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Jobs ───────────────────────────────────────────────────────────

    /// Post a new job. The optional correlation token links the job to its
    /// eventual on-chain confirmation.
    pub fn create_job(
        &self,
        new: NewJob,
        correlation: Option<String>,
    ) -> Result<Job, EngineError> {
        let job = Job::create(new)?;
        let mut inner = self.inner.write();
        inner.check_correlation(correlation.as_ref())?;
        inner.register_correlation(correlation, CorrelationTarget::Job(job.id));
        info!(job_id = %job.id, amount = %job.amount, "job posted");
        inner.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    /// Fetch a job by id.
    pub fn job(&self, id: &JobId) -> Result<Job, EngineError> {
        self.inner
            .read()
            .jobs
            .get(id)
            .cloned()
            .ok_or(EngineError::JobNotFound(*id))
    }

    /// All jobs, newest first.
    pub fn jobs(&self) -> Vec<Job> {
        let inner = self.inner.read();
        let mut jobs: Vec<Job> = inner.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.0.cmp(&b.id.0)));
        jobs
    }

    /// A freelancer accepts an open job.
    pub fn accept_job(&self, id: &JobId, actor: Address) -> Result<Job, EngineError> {
        let mut inner = self.inner.write();
        let job = inner.job_mut(id)?;
        job.accept(actor)?;
        Ok(job.clone())
    }

    /// The freelancer submits a deliverable.
    pub fn submit_deliverable(
        &self,
        id: &JobId,
        actor: Address,
        deliverable_ref: ContentRef,
    ) -> Result<Job, EngineError> {
        let mut inner = self.inner.write();
        let job = inner.job_mut(id)?;
        job.submit_deliverable(actor, deliverable_ref)?;
        Ok(job.clone())
    }

    /// The client approves the deliverable, releasing escrow to the
    /// freelancer.
    ///
    /// The payout is emitted only when this call performs the transition; a
    /// retried approval is a no-op success with no second payout.
    pub fn approve_job(
        &self,
        id: &JobId,
        actor: Address,
    ) -> Result<(Job, Option<Payout>), EngineError> {
        let mut inner = self.inner.write();
        let job = inner.job_mut(id)?;
        let already_approved = job.status == JobStatus::Approved;
        job.approve(actor)?;
        if already_approved {
            return Ok((job.clone(), None));
        }
        let payee = job
            .freelancer
            .clone()
            .ok_or_else(|| EngineError::InvalidInput("approved job has no freelancer".into()))?;
        let payout = Payout {
            job_id: job.id,
            amount: job.amount,
            payee,
        };
        info!(job_id = %job.id, amount = %job.amount, "job approved, escrow released");
        Ok((job.clone(), Some(payout)))
    }

    // ── Disputes ───────────────────────────────────────────────────────

    /// Raise a dispute over a submitted deliverable, filing the raiser's
    /// initial evidence in the same step.
    ///
    /// The job moves to Disputed and the dispute record, with its opening
    /// evidence, is created in the same critical section. At most one
    /// dispute per job, ever; a redelivered raise by the original raiser is
    /// a no-op success returning the existing dispute, while a second raise
    /// by the other party is [`EngineError::DisputeAlreadyOpen`].
    pub fn raise_dispute(
        &self,
        job_id: &JobId,
        actor: Address,
        reason: impl Into<String>,
        evidence_refs: Vec<ContentRef>,
        correlation: Option<String>,
    ) -> Result<Dispute, EngineError> {
        let mut inner = self.inner.write();
        if let Some(dispute_id) = inner.dispute_by_job.get(job_id).copied() {
            let dispute = inner.dispute_mut(&dispute_id)?;
            if dispute.raised_by == actor {
                return Ok(dispute.clone());
            }
            return Err(EngineError::DisputeAlreadyOpen(*job_id));
        }
        inner.check_correlation(correlation.as_ref())?;
        let mut dispute = Dispute::raise(*job_id, actor.clone(), reason)?;
        let job = inner.job_mut(job_id)?;
        job.mark_disputed(&actor)?;
        // mark_disputed already verified the actor is a party
        let role = if actor == job.client {
            PartyRole::Client
        } else {
            PartyRole::Freelancer
        };
        let description = dispute.reason.clone();
        let uploaded_at = Timestamp::now();
        for content_ref in evidence_refs {
            dispute.add_evidence(
                role,
                Evidence {
                    content_ref,
                    description: description.clone(),
                    uploaded_by: actor.clone(),
                    uploaded_at,
                },
            )?;
        }
        info!(job_id = %job_id, dispute_id = %dispute.id, "dispute raised");
        inner.register_correlation(correlation, CorrelationTarget::Dispute(dispute.id));
        inner.dispute_by_job.insert(*job_id, dispute.id);
        inner.disputes.insert(dispute.id, dispute.clone());
        Ok(dispute)
    }

    /// Fetch a dispute by id.
    pub fn dispute(&self, id: &DisputeId) -> Result<Dispute, EngineError> {
        self.inner
            .read()
            .disputes
            .get(id)
            .cloned()
            .ok_or(EngineError::DisputeNotFound(*id))
    }

    /// All disputes, newest first.
    pub fn disputes(&self) -> Vec<Dispute> {
        let inner = self.inner.read();
        let mut disputes: Vec<Dispute> = inner.disputes.values().cloned().collect();
        disputes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.0.cmp(&b.id.0)));
        disputes
    }

    /// Snapshot a dispute together with its job, for building an
    /// arbitration request outside the lock.
    pub fn dispute_case(&self, id: &DisputeId) -> Result<(Job, Dispute), EngineError> {
        let inner = self.inner.read();
        let dispute = inner
            .disputes
            .get(id)
            .cloned()
            .ok_or(EngineError::DisputeNotFound(*id))?;
        let job = inner
            .jobs
            .get(&dispute.job_id)
            .cloned()
            .ok_or(EngineError::JobNotFound(dispute.job_id))?;
        Ok((job, dispute))
    }

    /// File an evidence item. The uploader's side is derived from the job's
    /// parties.
    pub fn add_evidence(
        &self,
        dispute_id: &DisputeId,
        actor: Address,
        content_ref: ContentRef,
        description: impl Into<String>,
    ) -> Result<Dispute, EngineError> {
        let mut inner = self.inner.write();
        let job_id = inner.dispute_mut(dispute_id)?.job_id;
        let role = {
            let job = inner.job_mut(&job_id)?;
            if actor == job.client {
                PartyRole::Client
            } else if job.freelancer.as_ref() == Some(&actor) {
                PartyRole::Freelancer
            } else {
                return Err(EngineError::Unauthorized {
                    action: "file evidence",
                    actor,
                });
            }
        };
        let dispute = inner.dispute_mut(dispute_id)?;
        dispute.add_evidence(
            role,
            Evidence {
                content_ref,
                description: description.into(),
                uploaded_by: actor,
                uploaded_at: Timestamp::now(),
            },
        )?;
        Ok(dispute.clone())
    }

    /// Apply an arbitration result produced outside the lock.
    ///
    /// Revalidates the dispute's current status; a late response for a
    /// dispute that has since moved on is rejected, not applied.
    pub fn attach_analysis(
        &self,
        dispute_id: &DisputeId,
        analysis: AiAnalysis,
    ) -> Result<Dispute, EngineError> {
        let mut inner = self.inner.write();
        let dispute = inner.dispute_mut(dispute_id)?;
        dispute.attach_analysis(analysis)?;
        info!(dispute_id = %dispute_id, "ai analysis attached");
        Ok(dispute.clone())
    }

    /// Draw a panel from the pool and assign it.
    ///
    /// The job's own parties are excluded from the draw and, defensively,
    /// re-checked against the returned panel.
    pub fn assign_jurors(
        &self,
        dispute_id: &DisputeId,
        pool: &dyn JurorPool,
    ) -> Result<Dispute, EngineError> {
        let mut inner = self.inner.write();
        let (job_id, status, assigned) = {
            let dispute = inner.dispute_mut(dispute_id)?;
            (dispute.job_id, dispute.status, dispute.jurors.is_some())
        };
        if assigned {
            return Err(EngineError::JurorsAlreadyAssigned(*dispute_id));
        }
        if status != DisputeStatus::AiAnalyzed {
            return Err(EngineError::IllegalTransition {
                action: "assign jurors",
                current: status.as_str(),
                required: DisputeStatus::AiAnalyzed.as_str(),
            });
        }
        let mut excluded: Vec<Address> = Vec::with_capacity(2);
        {
            let job = inner.job_mut(&job_id)?;
            excluded.push(job.client.clone());
            if let Some(freelancer) = &job.freelancer {
                excluded.push(freelancer.clone());
            }
        }
        let panel = pool.select(&excluded)?;
        if panel.iter().any(|j| excluded.contains(j)) {
            return Err(EngineError::JurorSelection(
                "pool returned a party to the dispute".into(),
            ));
        }
        debug_assert_eq!(panel.len(), PANEL_SIZE);
        let dispute = inner.dispute_mut(dispute_id)?;
        dispute.assign_jurors(panel)?;
        info!(dispute_id = %dispute_id, "juror panel assigned, voting open");
        Ok(dispute.clone())
    }

    /// Cast a juror's vote. If this vote completes the majority, the
    /// dispute resolves and its job finalizes in the same critical section,
    /// and the receipt carries the escrow payout.
    pub fn cast_vote(
        &self,
        dispute_id: &DisputeId,
        juror: Address,
        decision: VoteDecision,
    ) -> Result<VoteReceipt, EngineError> {
        let mut inner = self.inner.write();
        let job_id = inner.dispute_mut(dispute_id)?.job_id;
        let outcome = {
            let dispute = inner.dispute_mut(dispute_id)?;
            consensus::cast_vote(dispute, juror, decision)?
        };
        let payout = match outcome {
            None => None,
            Some(outcome) => {
                let job = inner.job_mut(&job_id)?;
                job.finalize()?;
                let payee = match outcome {
                    DisputeOutcome::ClientWins => job.client.clone(),
                    DisputeOutcome::FreelancerWins => job
                        .freelancer
                        .clone()
                        .ok_or_else(|| {
                            EngineError::InvalidInput("disputed job has no freelancer".into())
                        })?,
                    DisputeOutcome::Pending => unreachable!("consensus never yields Pending"),
                };
                Some(Payout {
                    job_id,
                    amount: job.amount,
                    payee,
                })
            }
        };
        let dispute = inner.dispute_mut(dispute_id)?.clone();
        Ok(VoteReceipt { dispute, payout })
    }

    // ── Settlement ─────────────────────────────────────────────────────

    /// Ingest a settlement confirmation. Duplicate and out-of-order
    /// deliveries are no-ops; only a conflicting rebinding errors.
    pub fn ingest_settlement(&self, event: SettlementEvent) -> Result<SettlementAck, EngineError> {
        let mut inner = self.inner.write();
        match event {
            SettlementEvent::JobCreated {
                correlation,
                contract_job_id,
            } => match inner.correlations.get(&correlation) {
                Some(CorrelationTarget::Job(job_id)) => {
                    let job_id = *job_id;
                    let job = inner.job_mut(&job_id)?;
                    bind_once(&mut job.contract_job_id, contract_job_id, "job")
                }
                Some(CorrelationTarget::Dispute(_)) => Err(EngineError::InvalidInput(
                    "correlation token belongs to a dispute, not a job".into(),
                )),
                None => Ok(SettlementAck::Ignored),
            },
            SettlementEvent::DisputeOpened {
                correlation,
                contract_dispute_id,
            } => match inner.correlations.get(&correlation) {
                Some(CorrelationTarget::Dispute(dispute_id)) => {
                    let dispute_id = *dispute_id;
                    let dispute = inner.dispute_mut(&dispute_id)?;
                    bind_once(
                        &mut dispute.contract_dispute_id,
                        contract_dispute_id,
                        "dispute",
                    )
                }
                Some(CorrelationTarget::Job(_)) => Err(EngineError::InvalidInput(
                    "correlation token belongs to a job, not a dispute".into(),
                )),
                None => Ok(SettlementAck::Ignored),
            },
            SettlementEvent::FundsReleased { contract_job_id } => {
                info!(contract_job_id, "on-chain escrow release confirmed");
                Ok(SettlementAck::Acknowledged)
            }
        }
    }
}

/// Bind an on-chain id exactly once. Redelivery of the same id is a no-op;
/// a different id is a relay fault.
fn bind_once(
    slot: &mut Option<u64>,
    incoming: u64,
    entity: &str,
) -> Result<SettlementAck, EngineError> {
    match slot {
        None => {
            *slot = Some(incoming);
            Ok(SettlementAck::Bound)
        }
        Some(existing) if *existing == incoming => Ok(SettlementAck::Duplicate),
        Some(existing) => Err(EngineError::InvalidInput(format!(
            "{entity} already bound to on-chain id {existing}, refusing rebind to {incoming}"
        ))),
    }
}

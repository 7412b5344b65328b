//! # Dispute Lifecycle
//!
//! Manages a dispute over a submitted deliverable through the state machine
//! `Raised → AiAnalyzed → Voting → Resolved`, strictly forward.
//!
//! ```text
//! Raised ──attach_analysis()──▶ AiAnalyzed ──assign_jurors()──▶ Voting
//!              ▲                    │                             │
//!              └──(re-analysis)─────┘                        cast_vote()
//!                                                          (via consensus)
//!                                                                │
//!                                                                ▼
//!                                                            Resolved
//! ```
//!
//! Evidence lists are append-only and per-party. The AI analysis is
//! advisory; it informs jurors but never resolves the dispute itself.
//! Juror assignment is one-time. Votes are unique per juror.
//!
//! Resolution happens through [`crate::consensus::cast_vote`], never through
//! a direct status write, so an outcome can only come from a counted
//! majority.

use serde::{Deserialize, Serialize};

use fairwork_core::{Address, AiAnalysis, ContentRef, DisputeId, JobId, Timestamp};

use crate::error::EngineError;

/// The lifecycle status of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    /// Filed by a party; evidence is being gathered.
    Raised,
    /// An advisory AI analysis is attached.
    AiAnalyzed,
    /// A juror panel is assigned and voting is open.
    Voting,
    /// A majority outcome was reached. Terminal state.
    Resolved,
}

impl DisputeStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raised => "RAISED",
            Self::AiAnalyzed => "AI_ANALYZED",
            Self::Voting => "VOTING",
            Self::Resolved => "RESOLVED",
        }
    }

    /// Whether this status is terminal (no further transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }

    /// Valid target statuses from this status.
    pub fn valid_transitions(&self) -> &'static [DisputeStatus] {
        match self {
            // re-analysis keeps the dispute in AiAnalyzed
            Self::Raised => &[Self::AiAnalyzed],
            Self::AiAnalyzed => &[Self::AiAnalyzed, Self::Voting],
            Self::Voting => &[Self::Resolved],
            Self::Resolved => &[],
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final outcome of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeOutcome {
    /// No outcome yet; the dispute is still in progress.
    Pending,
    /// Escrow refunds to the client.
    ClientWins,
    /// Escrow releases to the freelancer.
    FreelancerWins,
}

impl DisputeOutcome {
    /// The canonical string name of this outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::ClientWins => "CLIENT_WINS",
            Self::FreelancerWins => "FREELANCER_WINS",
        }
    }
}

impl std::fmt::Display for DisputeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the job an address sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyRole {
    /// The posting client.
    Client,
    /// The accepting freelancer.
    Freelancer,
}

/// A single evidence item attached to a dispute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Content-address of the evidence document.
    pub content_ref: ContentRef,
    /// Short description of what the item shows.
    pub description: String,
    /// The wallet that uploaded it.
    pub uploaded_by: Address,
    /// When it was uploaded (UTC).
    pub uploaded_at: Timestamp,
}

/// A juror's vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// The voting juror's wallet.
    pub juror: Address,
    /// Which party the juror sides with.
    pub decision: VoteDecision,
    /// When the vote was cast (UTC).
    pub voted_at: Timestamp,
}

/// Which party a vote favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteDecision {
    /// Side with the client.
    Client,
    /// Side with the freelancer.
    Freelancer,
}

/// A dispute over a submitted deliverable.
///
/// Created via [`Dispute::raise`]; advanced by
/// [`attach_analysis`](Dispute::attach_analysis),
/// [`assign_jurors`](Dispute::assign_jurors),
/// and the consensus module. Fields are public for serialization, but all
/// mutation goes through the transition methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    /// Unique dispute identifier.
    pub id: DisputeId,
    /// On-chain dispute identifier, bound once via settlement confirmation.
    pub contract_dispute_id: Option<u64>,
    /// The disputed job.
    pub job_id: JobId,
    /// The party that filed the dispute.
    pub raised_by: Address,
    /// Why the dispute was raised.
    pub reason: String,
    /// Evidence filed on the client's side. Append-only.
    pub client_evidence: Vec<Evidence>,
    /// Evidence filed on the freelancer's side. Append-only.
    pub freelancer_evidence: Vec<Evidence>,
    /// Advisory AI analysis, if one has been attached.
    pub ai_analysis: Option<AiAnalysis>,
    /// The assigned juror panel. Write-once.
    pub jurors: Option<[Address; 3]>,
    /// Votes cast so far. Append-only, unique per juror.
    pub votes: Vec<Vote>,
    /// Current lifecycle status.
    pub status: DisputeStatus,
    /// Final outcome. `Pending` until resolved.
    pub outcome: DisputeOutcome,
    /// When the dispute was raised (UTC).
    pub created_at: Timestamp,
    /// When the dispute was resolved (UTC). `None` until resolved.
    pub resolved_at: Option<Timestamp>,
}

impl Dispute {
    /// Raise a new dispute over a job, in the
    /// [`Raised`](DisputeStatus::Raised) status.
    ///
    /// The caller (the marketplace) is responsible for checking that the
    /// raiser is a party to the job and that the job has no open dispute.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the reason is blank.
    pub fn raise(
        job_id: JobId,
        raised_by: Address,
        reason: impl Into<String>,
    ) -> Result<Self, EngineError> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(EngineError::InvalidInput("reason must be non-empty".into()));
        }
        Ok(Self {
            id: DisputeId::new(),
            contract_dispute_id: None,
            job_id,
            raised_by,
            reason,
            client_evidence: Vec::new(),
            freelancer_evidence: Vec::new(),
            ai_analysis: None,
            jurors: None,
            votes: Vec::new(),
            status: DisputeStatus::Raised,
            outcome: DisputeOutcome::Pending,
            created_at: Timestamp::now(),
            resolved_at: None,
        })
    }

    /// Append an evidence item to one party's list.
    ///
    /// Evidence may be filed at any point before resolution, including
    /// while voting is open. Lists are append-only; nothing is ever
    /// removed or reordered.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DisputeAlreadyResolved`] once the dispute is
    /// terminal.
    pub fn add_evidence(&mut self, role: PartyRole, evidence: Evidence) -> Result<(), EngineError> {
        if self.status.is_terminal() {
            return Err(EngineError::DisputeAlreadyResolved(self.id));
        }
        match role {
            PartyRole::Client => self.client_evidence.push(evidence),
            PartyRole::Freelancer => self.freelancer_evidence.push(evidence),
        }
        Ok(())
    }

    /// Attach an advisory AI analysis, moving to
    /// [`AiAnalyzed`](DisputeStatus::AiAnalyzed).
    ///
    /// Allowed from `Raised` or `AiAnalyzed`; re-analysis over fresh
    /// evidence overwrites the previous record. Once jurors are deliberating
    /// the analysis is frozen, so `Voting` and `Resolved` reject the attach.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::IllegalTransition`] from `Voting` or
    /// `Resolved`.
    pub fn attach_analysis(&mut self, analysis: AiAnalysis) -> Result<(), EngineError> {
        match self.status {
            DisputeStatus::Raised | DisputeStatus::AiAnalyzed => {
                self.ai_analysis = Some(analysis);
                self.status = DisputeStatus::AiAnalyzed;
                Ok(())
            }
            current => Err(EngineError::IllegalTransition {
                action: "attach analysis",
                current: current.as_str(),
                required: "RAISED or AI_ANALYZED",
            }),
        }
    }

    /// Assign the three-juror panel, moving to
    /// [`Voting`](DisputeStatus::Voting).
    ///
    /// Assignment is one-time and requires an attached analysis. Jurors
    /// must be pairwise distinct; exclusion of the job's own parties is the
    /// marketplace's check, since the dispute record does not know them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::JurorsAlreadyAssigned`] on a second
    /// assignment, [`EngineError::InvalidInput`] for a panel with repeated
    /// addresses, or [`EngineError::IllegalTransition`] outside
    /// `AiAnalyzed`.
    pub fn assign_jurors(&mut self, jurors: [Address; 3]) -> Result<(), EngineError> {
        if self.jurors.is_some() {
            return Err(EngineError::JurorsAlreadyAssigned(self.id));
        }
        if self.status != DisputeStatus::AiAnalyzed {
            return Err(EngineError::IllegalTransition {
                action: "assign jurors",
                current: self.status.as_str(),
                required: DisputeStatus::AiAnalyzed.as_str(),
            });
        }
        if jurors[0] == jurors[1] || jurors[0] == jurors[2] || jurors[1] == jurors[2] {
            return Err(EngineError::InvalidInput(
                "juror panel must contain three distinct addresses".into(),
            ));
        }
        self.jurors = Some(jurors);
        self.status = DisputeStatus::Voting;
        Ok(())
    }

    /// Whether the address sits on the assigned panel.
    pub fn is_juror(&self, addr: &Address) -> bool {
        self.jurors
            .as_ref()
            .is_some_and(|panel| panel.contains(addr))
    }

    /// Whether the juror has already voted.
    pub fn has_voted(&self, addr: &Address) -> bool {
        self.votes.iter().any(|v| v.juror == *addr)
    }

    /// Mark the dispute resolved. Crate-internal; only the consensus module
    /// finalizes, so an outcome always comes from a counted majority.
    pub(crate) fn resolve(&mut self, outcome: DisputeOutcome) {
        debug_assert!(outcome != DisputeOutcome::Pending);
        self.status = DisputeStatus::Resolved;
        self.outcome = outcome;
        self.resolved_at = Some(Timestamp::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairwork_core::Recommendation;

    fn addr(last: &str) -> Address {
        Address::new(format!("0x{last:0>40}")).unwrap()
    }

    fn analysis() -> AiAnalysis {
        AiAnalysis::new(
            Recommendation::Neutral,
            60,
            "Evidence is balanced.",
            vec!["Both parties documented their positions".to_string()],
            Timestamp::now(),
        )
        .unwrap()
    }

    fn raised() -> Dispute {
        Dispute::raise(JobId::new(), addr("c1"), "deliverable missing milestone 2").unwrap()
    }

    fn panel() -> [Address; 3] {
        [addr("a1"), addr("a2"), addr("a3")]
    }

    #[test]
    fn raise_starts_raised_pending() {
        let d = raised();
        assert_eq!(d.status, DisputeStatus::Raised);
        assert_eq!(d.outcome, DisputeOutcome::Pending);
        assert!(d.jurors.is_none());
        assert!(d.resolved_at.is_none());
    }

    #[test]
    fn raise_rejects_blank_reason() {
        assert!(Dispute::raise(JobId::new(), addr("c1"), "   ").is_err());
    }

    #[test]
    fn evidence_appends_per_side() {
        let mut d = raised();
        let item = Evidence {
            content_ref: ContentRef::new("QmE1").unwrap(),
            description: "chat log".to_string(),
            uploaded_by: addr("c1"),
            uploaded_at: Timestamp::now(),
        };
        d.add_evidence(PartyRole::Client, item.clone()).unwrap();
        d.add_evidence(PartyRole::Freelancer, item).unwrap();
        assert_eq!(d.client_evidence.len(), 1);
        assert_eq!(d.freelancer_evidence.len(), 1);
    }

    #[test]
    fn reanalysis_overwrites_before_voting() {
        let mut d = raised();
        d.attach_analysis(analysis()).unwrap();
        assert_eq!(d.status, DisputeStatus::AiAnalyzed);

        let second = AiAnalysis::new(
            Recommendation::Client,
            90,
            "Fresh evidence favors the client.",
            vec!["New logs contradict the submission".to_string()],
            Timestamp::now(),
        )
        .unwrap();
        d.attach_analysis(second.clone()).unwrap();
        assert_eq!(d.ai_analysis, Some(second));
        assert_eq!(d.status, DisputeStatus::AiAnalyzed);
    }

    #[test]
    fn analysis_frozen_once_voting() {
        let mut d = raised();
        d.attach_analysis(analysis()).unwrap();
        d.assign_jurors(panel()).unwrap();
        let err = d.attach_analysis(analysis()).unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition { .. }));
    }

    #[test]
    fn jurors_require_analysis_first() {
        let mut d = raised();
        let err = d.assign_jurors(panel()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::IllegalTransition {
                current: "RAISED",
                ..
            }
        ));
    }

    #[test]
    fn juror_assignment_is_write_once() {
        let mut d = raised();
        d.attach_analysis(analysis()).unwrap();
        d.assign_jurors(panel()).unwrap();
        assert_eq!(d.status, DisputeStatus::Voting);

        let err = d.assign_jurors(panel()).unwrap_err();
        assert!(matches!(err, EngineError::JurorsAlreadyAssigned(_)));
    }

    #[test]
    fn juror_panel_must_be_distinct() {
        let mut d = raised();
        d.attach_analysis(analysis()).unwrap();
        let err = d
            .assign_jurors([addr("a1"), addr("a1"), addr("a2")])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn evidence_rejected_after_resolution() {
        let mut d = raised();
        d.attach_analysis(analysis()).unwrap();
        d.assign_jurors(panel()).unwrap();
        d.resolve(DisputeOutcome::ClientWins);

        let err = d
            .add_evidence(
                PartyRole::Client,
                Evidence {
                    content_ref: ContentRef::new("QmLate").unwrap(),
                    description: "late".to_string(),
                    uploaded_by: addr("c1"),
                    uploaded_at: Timestamp::now(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::DisputeAlreadyResolved(_)));
    }

    #[test]
    fn status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&DisputeStatus::AiAnalyzed).unwrap(),
            "\"AI_ANALYZED\""
        );
        assert_eq!(DisputeOutcome::ClientWins.as_str(), "CLIENT_WINS");
    }
}

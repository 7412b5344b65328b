//! # Jury Consensus
//!
//! Majority-of-three vote counting. A dispute finalizes the moment either
//! side reaches two votes; the third vote is not awaited. Finalization is
//! one-time, enforced by the resolved-status check at the top of
//! [`cast_vote`].
//!
//! The tally is a pure function over the vote list, so outcome depends only
//! on the multiset of (juror, decision) pairs, never on arrival order.

use tracing::info;

use fairwork_core::{Address, Timestamp};

use crate::dispute::{Dispute, DisputeOutcome, DisputeStatus, Vote, VoteDecision};
use crate::error::EngineError;

/// Votes required for a majority on a three-juror panel.
pub const MAJORITY: usize = 2;

/// Count votes for each side. Returns `(client, freelancer)`.
pub fn tally(votes: &[Vote]) -> (usize, usize) {
    votes.iter().fold((0, 0), |(c, f), v| match v.decision {
        VoteDecision::Client => (c + 1, f),
        VoteDecision::Freelancer => (c, f + 1),
    })
}

/// The majority outcome, if either side has reached [`MAJORITY`].
pub fn majority(votes: &[Vote]) -> Option<DisputeOutcome> {
    let (client, freelancer) = tally(votes);
    if client >= MAJORITY {
        Some(DisputeOutcome::ClientWins)
    } else if freelancer >= MAJORITY {
        Some(DisputeOutcome::FreelancerWins)
    } else {
        None
    }
}

/// Cast a juror's vote, finalizing the dispute if a majority is reached.
///
/// Returns the outcome when this vote completes a majority, `None` while
/// voting remains open. The third vote after an early finalization never
/// reaches the tally: the resolved check rejects it first.
///
/// # Errors
///
/// - [`EngineError::DisputeAlreadyResolved`] once an outcome exists.
/// - [`EngineError::IllegalTransition`] if voting has not opened.
/// - [`EngineError::NotAJuror`] if the actor is not on the panel.
/// - [`EngineError::DuplicateVote`] on a juror's second vote.
pub fn cast_vote(
    dispute: &mut Dispute,
    juror: Address,
    decision: VoteDecision,
) -> Result<Option<DisputeOutcome>, EngineError> {
    if dispute.status.is_terminal() {
        return Err(EngineError::DisputeAlreadyResolved(dispute.id));
    }
    if dispute.status != DisputeStatus::Voting {
        return Err(EngineError::IllegalTransition {
            action: "cast vote",
            current: dispute.status.as_str(),
            required: DisputeStatus::Voting.as_str(),
        });
    }
    if !dispute.is_juror(&juror) {
        return Err(EngineError::NotAJuror {
            dispute_id: dispute.id,
            actor: juror,
        });
    }
    if dispute.has_voted(&juror) {
        return Err(EngineError::DuplicateVote {
            dispute_id: dispute.id,
            juror,
        });
    }

    dispute.votes.push(Vote {
        juror,
        decision,
        voted_at: Timestamp::now(),
    });

    if let Some(outcome) = majority(&dispute.votes) {
        dispute.resolve(outcome);
        info!(
            dispute_id = %dispute.id,
            outcome = outcome.as_str(),
            votes = dispute.votes.len(),
            "dispute resolved by jury majority"
        );
        return Ok(Some(outcome));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairwork_core::{AiAnalysis, JobId, Recommendation};
    use proptest::prelude::*;

    fn addr(last: &str) -> Address {
        Address::new(format!("0x{last:0>40}")).unwrap()
    }

    fn voting_dispute() -> Dispute {
        let mut d = Dispute::raise(JobId::new(), addr("c1"), "bad deliverable").unwrap();
        d.attach_analysis(
            AiAnalysis::new(
                Recommendation::Neutral,
                50,
                "Evenly balanced.",
                vec!["No decisive evidence".to_string()],
                Timestamp::now(),
            )
            .unwrap(),
        )
        .unwrap();
        d.assign_jurors([addr("a1"), addr("a2"), addr("a3")]).unwrap();
        d
    }

    #[test]
    fn second_agreeing_vote_finalizes() {
        let mut d = voting_dispute();
        assert_eq!(
            cast_vote(&mut d, addr("a1"), VoteDecision::Client).unwrap(),
            None
        );
        let outcome = cast_vote(&mut d, addr("a2"), VoteDecision::Client).unwrap();
        assert_eq!(outcome, Some(DisputeOutcome::ClientWins));
        assert_eq!(d.status, DisputeStatus::Resolved);
        assert!(d.resolved_at.is_some());
    }

    #[test]
    fn split_waits_for_third_vote() {
        let mut d = voting_dispute();
        cast_vote(&mut d, addr("a1"), VoteDecision::Client).unwrap();
        assert_eq!(
            cast_vote(&mut d, addr("a2"), VoteDecision::Freelancer).unwrap(),
            None
        );
        assert_eq!(d.status, DisputeStatus::Voting);

        let outcome = cast_vote(&mut d, addr("a3"), VoteDecision::Freelancer).unwrap();
        assert_eq!(outcome, Some(DisputeOutcome::FreelancerWins));
    }

    #[test]
    fn third_vote_after_finalization_is_rejected() {
        let mut d = voting_dispute();
        cast_vote(&mut d, addr("a1"), VoteDecision::Client).unwrap();
        cast_vote(&mut d, addr("a2"), VoteDecision::Client).unwrap();

        let err = cast_vote(&mut d, addr("a3"), VoteDecision::Freelancer).unwrap_err();
        assert!(matches!(err, EngineError::DisputeAlreadyResolved(_)));
        // outcome unchanged
        assert_eq!(d.outcome, DisputeOutcome::ClientWins);
        assert_eq!(d.votes.len(), 2);
    }

    #[test]
    fn non_juror_cannot_vote() {
        let mut d = voting_dispute();
        let err = cast_vote(&mut d, addr("99"), VoteDecision::Client).unwrap_err();
        assert!(matches!(err, EngineError::NotAJuror { .. }));
    }

    #[test]
    fn duplicate_vote_rejected() {
        let mut d = voting_dispute();
        cast_vote(&mut d, addr("a1"), VoteDecision::Client).unwrap();
        let err = cast_vote(&mut d, addr("a1"), VoteDecision::Freelancer).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateVote { .. }));
        assert_eq!(d.votes.len(), 1);
    }

    #[test]
    fn voting_requires_open_panel() {
        let mut d = Dispute::raise(JobId::new(), addr("c1"), "bad deliverable").unwrap();
        let err = cast_vote(&mut d, addr("a1"), VoteDecision::Client).unwrap_err();
        assert!(matches!(
            err,
            EngineError::IllegalTransition {
                required: "VOTING",
                ..
            }
        ));
    }

    proptest! {
        // Outcome depends only on which jurors voted which way, not on the
        // order votes arrive in.
        #[test]
        fn outcome_is_order_independent(perm in Just([0usize, 1, 2]).prop_shuffle(), decisions in proptest::array::uniform3(any::<bool>())) {
            let jurors = [addr("a1"), addr("a2"), addr("a3")];

            let run = |order: &[usize]| {
                let mut d = voting_dispute();
                let mut outcome = None;
                for &i in order {
                    let decision = if decisions[i] {
                        VoteDecision::Client
                    } else {
                        VoteDecision::Freelancer
                    };
                    match cast_vote(&mut d, jurors[i].clone(), decision) {
                        Ok(Some(o)) => outcome = Some(o),
                        Ok(None) => {}
                        // votes after finalization are rejected, fine
                        Err(EngineError::DisputeAlreadyResolved(_)) => {}
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
                outcome
            };

            let sequential = run(&[0, 1, 2]);
            let shuffled = run(&perm);
            prop_assert_eq!(sequential, shuffled);
        }
    }
}

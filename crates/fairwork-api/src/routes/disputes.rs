//! # Dispute API Routes
//!
//! HTTP surface for the dispute lifecycle: evidence filing, AI analysis,
//! juror assignment, and voting. The analyze handler is the only one that
//! leaves the process: it snapshots the case, runs the provider chain
//! without holding any lock, then applies the result through the
//! marketplace, which revalidates the dispute's status.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use fairwork_arbiter::CaseEvidence;
use fairwork_core::{Address, ContentRef, DisputeId};
use fairwork_engine::{Dispute, DisputeStatus, Evidence, Job, VoteDecision};

use crate::error::AppError;
use crate::routes::jobs::{payout_to_response, PayoutResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to file an evidence item.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddEvidenceRequest {
    /// The acting wallet address (must be a party to the disputed job).
    pub actor: String,
    /// Content-address of the evidence document.
    pub content_ref: String,
    /// Short description of what the item shows.
    pub description: String,
}

/// Request to cast a juror vote.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CastVoteRequest {
    /// The voting juror's wallet address.
    pub actor: String,
    /// "CLIENT" or "FREELANCER".
    pub decision: String,
}

/// An evidence item in API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvidenceResponse {
    pub content_ref: String,
    pub description: String,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

/// The advisory AI analysis in API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    pub recommendation: String,
    pub confidence: u8,
    pub summary: String,
    pub reasoning: Vec<String>,
    pub analyzed_at: String,
}

/// A cast vote in API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResponse {
    pub juror: String,
    pub decision: String,
    pub voted_at: String,
}

/// Dispute details in API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DisputeResponse {
    pub id: String,
    pub contract_dispute_id: Option<u64>,
    pub job_id: String,
    pub raised_by: String,
    pub reason: String,
    pub client_evidence: Vec<EvidenceResponse>,
    pub freelancer_evidence: Vec<EvidenceResponse>,
    pub ai_analysis: Option<AnalysisResponse>,
    pub jurors: Option<Vec<String>>,
    pub votes: Vec<VoteResponse>,
    pub status: String,
    pub outcome: String,
    pub valid_transitions: Vec<String>,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// Response for a vote, which may have resolved the dispute.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteReceiptResponse {
    pub dispute: DisputeResponse,
    /// Present only when this vote completed the majority.
    pub payout: Option<PayoutResponse>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the dispute lifecycle router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/disputes", get(list_disputes))
        .route("/v1/disputes/:id", get(get_dispute))
        .route("/v1/disputes/:id/evidence", post(add_evidence))
        .route("/v1/disputes/:id/analyze", post(analyze_dispute))
        .route("/v1/disputes/:id/jurors", post(assign_jurors))
        .route("/v1/disputes/:id/votes", post(cast_vote))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn evidence_to_response(item: &Evidence) -> EvidenceResponse {
    EvidenceResponse {
        content_ref: item.content_ref.to_string(),
        description: item.description.clone(),
        uploaded_by: item.uploaded_by.to_string(),
        uploaded_at: item.uploaded_at.to_iso8601(),
    }
}

pub(crate) fn dispute_to_response(dispute: &Dispute) -> DisputeResponse {
    DisputeResponse {
        id: dispute.id.as_uuid().to_string(),
        contract_dispute_id: dispute.contract_dispute_id,
        job_id: dispute.job_id.as_uuid().to_string(),
        raised_by: dispute.raised_by.to_string(),
        reason: dispute.reason.clone(),
        client_evidence: dispute.client_evidence.iter().map(evidence_to_response).collect(),
        freelancer_evidence: dispute
            .freelancer_evidence
            .iter()
            .map(evidence_to_response)
            .collect(),
        ai_analysis: dispute.ai_analysis.as_ref().map(|a| AnalysisResponse {
            recommendation: a.recommendation().as_str().to_string(),
            confidence: a.confidence(),
            summary: a.summary().to_string(),
            reasoning: a.reasoning().to_vec(),
            analyzed_at: a.analyzed_at().to_iso8601(),
        }),
        jurors: dispute
            .jurors
            .as_ref()
            .map(|panel| panel.iter().map(Address::to_string).collect()),
        votes: dispute
            .votes
            .iter()
            .map(|v| VoteResponse {
                juror: v.juror.to_string(),
                decision: match v.decision {
                    VoteDecision::Client => "CLIENT".to_string(),
                    VoteDecision::Freelancer => "FREELANCER".to_string(),
                },
                voted_at: v.voted_at.to_iso8601(),
            })
            .collect(),
        status: dispute.status.as_str().to_string(),
        outcome: dispute.outcome.as_str().to_string(),
        valid_transitions: dispute
            .status
            .valid_transitions()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        created_at: dispute.created_at.to_iso8601(),
        resolved_at: dispute.resolved_at.map(|t| t.to_iso8601()),
    }
}

fn parse_actor(actor: &str) -> Result<Address, AppError> {
    Address::new(actor).map_err(|e| AppError::Validation(format!("invalid actor: {e}")))
}

fn evidence_lines(items: &[Evidence]) -> String {
    if items.is_empty() {
        return "(none submitted)".to_string();
    }
    items
        .iter()
        .map(|e| format!("- {} ({})", e.description, e.content_ref))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten a case snapshot into the text the providers see.
fn case_evidence(job: &Job, dispute: &Dispute) -> CaseEvidence {
    CaseEvidence {
        job_description: format!("{}\n\n{}", job.title, job.description),
        deliverable: job
            .deliverable_ref
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(no deliverable on record)".to_string()),
        client_evidence: evidence_lines(&dispute.client_evidence),
        freelancer_evidence: evidence_lines(&dispute.freelancer_evidence),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/disputes — List all disputes, newest first.
#[utoipa::path(
    get,
    path = "/v1/disputes",
    responses(
        (status = 200, description = "List of disputes", body = Vec<DisputeResponse>),
    ),
    tag = "disputes"
)]
pub(crate) async fn list_disputes(State(state): State<AppState>) -> Json<Vec<DisputeResponse>> {
    let disputes = state.marketplace.disputes();
    Json(disputes.iter().map(dispute_to_response).collect())
}

/// GET /v1/disputes/:id — Get dispute details.
#[utoipa::path(
    get,
    path = "/v1/disputes/{id}",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Dispute details", body = DisputeResponse),
        (status = 404, description = "Dispute not found"),
    ),
    tag = "disputes"
)]
pub(crate) async fn get_dispute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DisputeResponse>, AppError> {
    let dispute = state.marketplace.dispute(&DisputeId(id))?;
    Ok(Json(dispute_to_response(&dispute)))
}

/// POST /v1/disputes/:id/evidence — A party files an evidence item.
#[utoipa::path(
    post,
    path = "/v1/disputes/{id}/evidence",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = AddEvidenceRequest,
    responses(
        (status = 200, description = "Evidence filed", body = DisputeResponse),
        (status = 403, description = "Actor is not a party to the job"),
        (status = 409, description = "Dispute already resolved"),
    ),
    tag = "disputes"
)]
pub(crate) async fn add_evidence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddEvidenceRequest>,
) -> Result<Json<DisputeResponse>, AppError> {
    let actor = parse_actor(&req.actor)?;
    let content_ref = ContentRef::new(&req.content_ref)?;
    let dispute =
        state
            .marketplace
            .add_evidence(&DisputeId(id), actor, content_ref, req.description)?;
    Ok(Json(dispute_to_response(&dispute)))
}

/// POST /v1/disputes/:id/analyze — Run the AI analysis.
///
/// The provider chain runs without holding the marketplace lock; the result
/// is applied afterwards and rejected if the dispute has since moved on.
#[utoipa::path(
    post,
    path = "/v1/disputes/{id}/analyze",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Analysis attached", body = DisputeResponse),
        (status = 409, description = "Dispute is past the analysis stage"),
        (status = 502, description = "All arbitration providers failed"),
        (status = 503, description = "No arbitration providers configured"),
    ),
    tag = "disputes"
)]
pub(crate) async fn analyze_dispute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DisputeResponse>, AppError> {
    let Some(arbiter) = state.arbiter.clone() else {
        return Err(AppError::ServiceUnavailable(
            "no arbitration providers configured".into(),
        ));
    };
    let dispute_id = DisputeId(id);
    let (job, dispute) = state.marketplace.dispute_case(&dispute_id)?;
    // Fail fast before spending a provider call; attach_analysis re-checks
    // in case the dispute moved while the call was in flight.
    if !matches!(
        dispute.status,
        DisputeStatus::Raised | DisputeStatus::AiAnalyzed
    ) {
        return Err(AppError::Conflict(format!(
            "cannot analyze dispute in status {}",
            dispute.status
        )));
    }

    let case = case_evidence(&job, &dispute);
    let analysis = arbiter.analyze(&case).await?;
    let dispute = state.marketplace.attach_analysis(&dispute_id, analysis)?;
    Ok(Json(dispute_to_response(&dispute)))
}

/// POST /v1/disputes/:id/jurors — Draw and assign the juror panel.
#[utoipa::path(
    post,
    path = "/v1/disputes/{id}/jurors",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Panel assigned, voting open", body = DisputeResponse),
        (status = 409, description = "Panel already assigned or no analysis yet"),
        (status = 503, description = "Juror pool cannot seat a panel"),
    ),
    tag = "disputes"
)]
pub(crate) async fn assign_jurors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DisputeResponse>, AppError> {
    let dispute = state
        .marketplace
        .assign_jurors(&DisputeId(id), state.juror_pool.as_ref())?;
    Ok(Json(dispute_to_response(&dispute)))
}

/// POST /v1/disputes/:id/votes — A juror casts a vote.
#[utoipa::path(
    post,
    path = "/v1/disputes/{id}/votes",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = CastVoteRequest,
    responses(
        (status = 200, description = "Vote counted", body = VoteReceiptResponse),
        (status = 403, description = "Actor is not on the panel"),
        (status = 409, description = "Duplicate vote or dispute already resolved"),
    ),
    tag = "disputes"
)]
pub(crate) async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CastVoteRequest>,
) -> Result<Json<VoteReceiptResponse>, AppError> {
    let actor = parse_actor(&req.actor)?;
    let decision = match req.decision.as_str() {
        "CLIENT" => VoteDecision::Client,
        "FREELANCER" => VoteDecision::Freelancer,
        other => {
            return Err(AppError::Validation(format!(
                "decision must be CLIENT or FREELANCER, got {other:?}"
            )))
        }
    };
    let receipt = state.marketplace.cast_vote(&DisputeId(id), actor, decision)?;
    Ok(Json(VoteReceiptResponse {
        dispute: dispute_to_response(&receipt.dispute),
        payout: receipt.payout.as_ref().map(payout_to_response),
    }))
}

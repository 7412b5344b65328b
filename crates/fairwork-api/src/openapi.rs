//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "FairWork API — Job & Dispute Lifecycle Engine",
        version = "0.3.2",
        description = "Escrowed freelance marketplace lifecycle engine.\n\nProvides:\n- **Job lifecycle** from posting through acceptance, delivery, and approval\n- **Dispute lifecycle** with per-party evidence, advisory AI analysis, and juror voting\n- **AI arbitration** over an ordered chain of OpenAI-compatible providers with automatic fallback\n- **Settlement correlation** binding jobs and disputes to their on-chain escrow counterparts\n\nActing identity travels as an `actor` wallet address in request bodies; signature verification sits with the wallet layer in front of this service."
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // ── Jobs ────────────────────────────────────────────────────────
        crate::routes::jobs::create_job,
        crate::routes::jobs::list_jobs,
        crate::routes::jobs::get_job,
        crate::routes::jobs::accept_job,
        crate::routes::jobs::submit_deliverable,
        crate::routes::jobs::approve_job,
        crate::routes::jobs::raise_dispute,
        // ── Disputes ────────────────────────────────────────────────────
        crate::routes::disputes::list_disputes,
        crate::routes::disputes::get_dispute,
        crate::routes::disputes::add_evidence,
        crate::routes::disputes::analyze_dispute,
        crate::routes::disputes::assign_jurors,
        crate::routes::disputes::cast_vote,
        // ── Settlement ──────────────────────────────────────────────────
        crate::routes::settlement::ingest_event,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::jobs::CreateJobRequest,
        crate::routes::jobs::ActorRequest,
        crate::routes::jobs::SubmitRequest,
        crate::routes::jobs::RaiseDisputeRequest,
        crate::routes::jobs::JobResponse,
        crate::routes::jobs::PayoutResponse,
        crate::routes::jobs::ApproveResponse,
        crate::routes::disputes::AddEvidenceRequest,
        crate::routes::disputes::CastVoteRequest,
        crate::routes::disputes::EvidenceResponse,
        crate::routes::disputes::AnalysisResponse,
        crate::routes::disputes::VoteResponse,
        crate::routes::disputes::DisputeResponse,
        crate::routes::disputes::VoteReceiptResponse,
        crate::routes::settlement::SettlementEventRequest,
        crate::routes::settlement::SettlementAckResponse,
    )),
    tags(
        (name = "jobs", description = "Job lifecycle"),
        (name = "disputes", description = "Dispute lifecycle and arbitration"),
        (name = "settlement", description = "On-chain confirmation ingestion"),
    )
)]
pub struct ApiDoc;

/// Serve the generated spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

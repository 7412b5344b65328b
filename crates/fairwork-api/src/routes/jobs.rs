//! # Job API Routes
//!
//! HTTP surface for the job lifecycle: posting, listing, acceptance,
//! deliverable submission, approval, and dispute initiation. The acting
//! identity travels as an `actor` wallet address in the request body;
//! wallet signature verification belongs to the wallet collaborator in
//! front of this service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use fairwork_core::{Address, ContentRef, JobId, Timestamp, UsdAmount};
use fairwork_engine::{Job, NewJob, Payout};

use crate::error::AppError;
use crate::routes::disputes::{dispute_to_response, DisputeResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to post a new job.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJobRequest {
    /// Short title shown in listings.
    pub title: String,
    /// Full description of the work.
    pub description: String,
    /// Content-address of the full job brief.
    pub description_ref: String,
    /// Escrow amount as a decimal string (e.g. "50", "50.00").
    pub amount: String,
    /// Delivery deadline, ISO 8601 UTC with `Z` suffix.
    pub deadline: String,
    /// The posting client's wallet address.
    pub client: String,
    /// Optional correlation token linking the job to its on-chain
    /// confirmation.
    pub correlation: Option<String>,
}

/// Request carrying only the acting wallet.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActorRequest {
    /// The acting wallet address.
    pub actor: String,
}

/// Request to submit a deliverable.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRequest {
    /// The acting wallet address (must be the freelancer).
    pub actor: String,
    /// Content-address of the deliverable.
    pub deliverable_ref: String,
}

/// Request to raise a dispute over a submitted deliverable.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RaiseDisputeRequest {
    /// The acting wallet address (must be a party to the job).
    pub actor: String,
    /// Why the dispute is being raised.
    pub reason: String,
    /// Content-addresses of the raiser's opening evidence, filed with the
    /// dispute in one step.
    #[serde(default)]
    pub evidence_refs: Vec<String>,
    /// Optional correlation token for the on-chain dispute confirmation.
    pub correlation: Option<String>,
}

/// Job details in API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: String,
    pub contract_job_id: Option<u64>,
    pub title: String,
    pub description: String,
    pub description_ref: String,
    /// Escrow amount as a decimal string with six fractional digits.
    pub amount: String,
    pub deadline: String,
    pub client: String,
    pub freelancer: Option<String>,
    pub deliverable_ref: Option<String>,
    pub status: String,
    pub valid_transitions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// An escrow release instruction surfaced to the settlement collaborator.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PayoutResponse {
    pub job_id: String,
    /// Amount as a decimal string with six fractional digits.
    pub amount: String,
    pub payee: String,
}

/// Response for an approval, which may release escrow.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApproveResponse {
    pub job: JobResponse,
    /// Present only when this request performed the approval.
    pub payout: Option<PayoutResponse>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the job lifecycle router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/jobs", post(create_job).get(list_jobs))
        .route("/v1/jobs/:id", get(get_job))
        .route("/v1/jobs/:id/accept", post(accept_job))
        .route("/v1/jobs/:id/submit", post(submit_deliverable))
        .route("/v1/jobs/:id/approve", post(approve_job))
        .route("/v1/jobs/:id/dispute", post(raise_dispute))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn job_to_response(job: &Job) -> JobResponse {
    JobResponse {
        id: job.id.as_uuid().to_string(),
        contract_job_id: job.contract_job_id,
        title: job.title.clone(),
        description: job.description.clone(),
        description_ref: job.description_ref.to_string(),
        amount: job.amount.to_string(),
        deadline: job.deadline.to_iso8601(),
        client: job.client.to_string(),
        freelancer: job.freelancer.as_ref().map(Address::to_string),
        deliverable_ref: job.deliverable_ref.as_ref().map(ContentRef::to_string),
        status: job.status.as_str().to_string(),
        valid_transitions: job
            .status
            .valid_transitions()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        created_at: job.created_at.to_iso8601(),
        updated_at: job.updated_at.to_iso8601(),
    }
}

pub(crate) fn payout_to_response(payout: &Payout) -> PayoutResponse {
    PayoutResponse {
        job_id: payout.job_id.as_uuid().to_string(),
        amount: payout.amount.to_string(),
        payee: payout.payee.to_string(),
    }
}

fn parse_actor(actor: &str) -> Result<Address, AppError> {
    Address::new(actor).map_err(|e| AppError::Validation(format!("invalid actor: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/jobs — Post a new job.
#[utoipa::path(
    post,
    path = "/v1/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job posted", body = JobResponse),
        (status = 422, description = "Validation error"),
    ),
    tag = "jobs"
)]
pub(crate) async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let client = Address::new(&req.client)
        .map_err(|e| AppError::Validation(format!("invalid client: {e}")))?;
    let amount = UsdAmount::parse(&req.amount)?;
    let deadline = Timestamp::parse(&req.deadline)?;
    let description_ref = ContentRef::new(&req.description_ref)?;

    let job = state.marketplace.create_job(
        NewJob {
            title: req.title,
            description: req.description,
            description_ref,
            amount,
            deadline,
            client,
        },
        req.correlation,
    )?;
    Ok((StatusCode::CREATED, Json(job_to_response(&job))))
}

/// GET /v1/jobs — List all jobs, newest first.
#[utoipa::path(
    get,
    path = "/v1/jobs",
    responses(
        (status = 200, description = "List of jobs", body = Vec<JobResponse>),
    ),
    tag = "jobs"
)]
pub(crate) async fn list_jobs(State(state): State<AppState>) -> Json<Vec<JobResponse>> {
    let jobs = state.marketplace.jobs();
    Json(jobs.iter().map(job_to_response).collect())
}

/// GET /v1/jobs/:id — Get job details.
#[utoipa::path(
    get,
    path = "/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job UUID")),
    responses(
        (status = 200, description = "Job details", body = JobResponse),
        (status = 404, description = "Job not found"),
    ),
    tag = "jobs"
)]
pub(crate) async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>, AppError> {
    let job = state.marketplace.job(&JobId(id))?;
    Ok(Json(job_to_response(&job)))
}

/// POST /v1/jobs/:id/accept — A freelancer takes the job.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/accept",
    params(("id" = String, Path, description = "Job UUID")),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Job accepted", body = JobResponse),
        (status = 403, description = "Client cannot accept own job"),
        (status = 409, description = "Job is not open"),
    ),
    tag = "jobs"
)]
pub(crate) async fn accept_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let actor = parse_actor(&req.actor)?;
    let job = state.marketplace.accept_job(&JobId(id), actor)?;
    Ok(Json(job_to_response(&job)))
}

/// POST /v1/jobs/:id/submit — The freelancer submits a deliverable.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/submit",
    params(("id" = String, Path, description = "Job UUID")),
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Deliverable submitted", body = JobResponse),
        (status = 403, description = "Actor is not the freelancer"),
        (status = 409, description = "Job is not accepted"),
    ),
    tag = "jobs"
)]
pub(crate) async fn submit_deliverable(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let actor = parse_actor(&req.actor)?;
    let deliverable_ref = ContentRef::new(&req.deliverable_ref)?;
    let job = state
        .marketplace
        .submit_deliverable(&JobId(id), actor, deliverable_ref)?;
    Ok(Json(job_to_response(&job)))
}

/// POST /v1/jobs/:id/approve — The client approves, releasing escrow.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/approve",
    params(("id" = String, Path, description = "Job UUID")),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Job approved", body = ApproveResponse),
        (status = 403, description = "Actor is not the client"),
        (status = 409, description = "Job is not submitted"),
    ),
    tag = "jobs"
)]
pub(crate) async fn approve_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<ApproveResponse>, AppError> {
    let actor = parse_actor(&req.actor)?;
    let (job, payout) = state.marketplace.approve_job(&JobId(id), actor)?;
    Ok(Json(ApproveResponse {
        job: job_to_response(&job),
        payout: payout.as_ref().map(payout_to_response),
    }))
}

/// POST /v1/jobs/:id/dispute — A party raises a dispute.
#[utoipa::path(
    post,
    path = "/v1/jobs/{id}/dispute",
    params(("id" = String, Path, description = "Job UUID")),
    request_body = RaiseDisputeRequest,
    responses(
        (status = 201, description = "Dispute raised", body = DisputeResponse),
        (status = 403, description = "Actor is not a party to the job"),
        (status = 409, description = "Job is not submitted or already disputed"),
    ),
    tag = "jobs"
)]
pub(crate) async fn raise_dispute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RaiseDisputeRequest>,
) -> Result<(StatusCode, Json<DisputeResponse>), AppError> {
    let actor = parse_actor(&req.actor)?;
    let evidence_refs = req
        .evidence_refs
        .iter()
        .map(ContentRef::new)
        .collect::<Result<Vec<_>, _>>()?;
    let dispute = state.marketplace.raise_dispute(
        &JobId(id),
        actor,
        req.reason,
        evidence_refs,
        req.correlation,
    )?;
    Ok((StatusCode::CREATED, Json(dispute_to_response(&dispute))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    use fairwork_engine::{FixedPool, Marketplace};

    fn addr(last: &str) -> String {
        format!("0x{last:0>40}")
    }

    fn test_state() -> AppState {
        let pool = FixedPool::new(vec![
            Address::new(addr("a1")).unwrap(),
            Address::new(addr("a2")).unwrap(),
            Address::new(addr("a3")).unwrap(),
        ])
        .unwrap();
        AppState::new(Arc::new(Marketplace::new()), None, Arc::new(pool))
    }

    fn test_app(state: AppState) -> Router<()> {
        router().with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        use http_body_util::BodyExt;
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    fn create_job_body() -> serde_json::Value {
        serde_json::json!({
            "title": "Landing page build",
            "description": "Build and deploy the marketing landing page",
            "description_ref": "QmJobBrief",
            "amount": "50.00",
            "deadline": "2030-01-01T00:00:00Z",
            "client": addr("c1"),
        })
    }

    async fn created_job(app: &Router<()>) -> JobResponse {
        let response = app
            .clone()
            .oneshot(post_json("/v1/jobs", create_job_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn create_job_starts_open() {
        let app = test_app(test_state());
        let job = created_job(&app).await;
        assert_eq!(job.status, "OPEN");
        assert_eq!(job.amount, "50.000000");
        assert_eq!(job.client, addr("c1"));
        assert_eq!(job.valid_transitions, vec!["ACCEPTED"]);
    }

    #[tokio::test]
    async fn create_job_rejects_bad_amount() {
        let app = test_app(test_state());
        let mut body = create_job_body();
        body["amount"] = "12.3456789".into();
        let response = app.oneshot(post_json("/v1/jobs", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn create_job_rejects_offset_deadline() {
        let app = test_app(test_state());
        let mut body = create_job_body();
        body["deadline"] = "2030-01-01T00:00:00+05:00".into();
        let response = app.oneshot(post_json("/v1/jobs", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn mixed_case_actor_is_canonicalized() {
        let app = test_app(test_state());
        let job = created_job(&app).await;
        let response = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/accept", job.id),
                serde_json::json!({ "actor": format!("0x{:0>40}", "F1").to_string() }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let job: JobResponse = body_json(response).await;
        assert_eq!(job.freelancer.unwrap(), addr("f1"));
    }

    #[tokio::test]
    async fn lifecycle_to_approval_over_http() {
        let app = test_app(test_state());
        let job = created_job(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{}/accept", job.id),
                serde_json::json!({ "actor": addr("f1") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{}/submit", job.id),
                serde_json::json!({ "actor": addr("f1"), "deliverable_ref": "QmWork" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let submitted: JobResponse = body_json(response).await;
        assert_eq!(submitted.status, "SUBMITTED");
        assert_eq!(submitted.deliverable_ref.as_deref(), Some("QmWork"));

        let response = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/approve", job.id),
                serde_json::json!({ "actor": addr("c1") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let approved: ApproveResponse = body_json(response).await;
        assert_eq!(approved.job.status, "APPROVED");
        let payout = approved.payout.unwrap();
        assert_eq!(payout.payee, addr("f1"));
        assert_eq!(payout.amount, "50.000000");
    }

    #[tokio::test]
    async fn approve_from_open_is_conflict() {
        let app = test_app(test_state());
        let job = created_job(&app).await;
        let response = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/approve", job.id),
                serde_json::json!({ "actor": addr("c1") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn outsider_approval_is_forbidden() {
        let app = test_app(test_state());
        let job = created_job(&app).await;
        app.clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{}/accept", job.id),
                serde_json::json!({ "actor": addr("f1") }),
            ))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{}/submit", job.id),
                serde_json::json!({ "actor": addr("f1"), "deliverable_ref": "QmWork" }),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                &format!("/v1/jobs/{}/approve", job.id),
                serde_json::json!({ "actor": addr("99") }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let app = test_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/jobs/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn dispute_route_creates_dispute() {
        let app = test_app(test_state());
        let job = created_job(&app).await;
        app.clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{}/accept", job.id),
                serde_json::json!({ "actor": addr("f1") }),
            ))
            .await
            .unwrap();
        app.clone()
            .oneshot(post_json(
                &format!("/v1/jobs/{}/submit", job.id),
                serde_json::json!({ "actor": addr("f1"), "deliverable_ref": "QmWork" }),
            ))
            .await
            .unwrap();

        let body = serde_json::json!({
            "actor": addr("c1"),
            "reason": "scope not met",
            "evidence_refs": ["QmScopeDoc"],
        });
        let response = app
            .clone()
            .oneshot(post_json(&format!("/v1/jobs/{}/dispute", job.id), body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let dispute: DisputeResponse = body_json(response).await;
        assert_eq!(dispute.status, "RAISED");
        assert_eq!(dispute.job_id, job.id);
        assert_eq!(dispute.client_evidence.len(), 1);
        assert_eq!(dispute.client_evidence[0].content_ref, "QmScopeDoc");

        // a wallet retry of the same raise is a no-op success
        let response = app
            .oneshot(post_json(&format!("/v1/jobs/{}/dispute", job.id), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let retried: DisputeResponse = body_json(response).await;
        assert_eq!(retried.id, dispute.id);
        assert_eq!(retried.client_evidence.len(), 1);
    }
}

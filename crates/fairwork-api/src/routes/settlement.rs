//! # Settlement API Routes
//!
//! Ingestion endpoint for on-chain confirmation events relayed by the
//! settlement watcher. Delivery is at-least-once and unordered, so every
//! event is safe to replay: duplicates and unknown correlation tokens are
//! acknowledged without effect, and only a conflicting rebinding of an
//! already bound on-chain id is an error.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fairwork_engine::SettlementEvent;

use crate::error::AppError;
use crate::state::AppState;

/// An on-chain confirmation event, tagged by `type`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementEventRequest {
    /// The escrow contract created the job.
    JobCreated {
        /// The correlation token given at job creation.
        correlation: String,
        /// The contract's numeric job id.
        contract_job_id: u64,
    },
    /// The escrow contract opened the dispute.
    DisputeOpened {
        /// The correlation token given when the dispute was raised.
        correlation: String,
        /// The contract's numeric dispute id.
        contract_dispute_id: u64,
    },
    /// The escrow contract released funds.
    FundsReleased {
        /// The contract's numeric job id.
        contract_job_id: u64,
    },
}

impl From<SettlementEventRequest> for SettlementEvent {
    fn from(req: SettlementEventRequest) -> Self {
        match req {
            SettlementEventRequest::JobCreated {
                correlation,
                contract_job_id,
            } => Self::JobCreated {
                correlation,
                contract_job_id,
            },
            SettlementEventRequest::DisputeOpened {
                correlation,
                contract_dispute_id,
            } => Self::DisputeOpened {
                correlation,
                contract_dispute_id,
            },
            SettlementEventRequest::FundsReleased { contract_job_id } => {
                Self::FundsReleased { contract_job_id }
            }
        }
    }
}

/// How the event was applied.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettlementAckResponse {
    /// "BOUND", "DUPLICATE", "IGNORED", or "ACKNOWLEDGED".
    pub ack: String,
}

/// Build the settlement ingestion router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/settlement/events", post(ingest_event))
}

/// POST /v1/settlement/events — Ingest an on-chain confirmation.
#[utoipa::path(
    post,
    path = "/v1/settlement/events",
    request_body = SettlementEventRequest,
    responses(
        (status = 200, description = "Event applied", body = SettlementAckResponse),
        (status = 422, description = "Conflicting rebinding or mismatched token"),
    ),
    tag = "settlement"
)]
pub(crate) async fn ingest_event(
    State(state): State<AppState>,
    Json(req): Json<SettlementEventRequest>,
) -> Result<Json<SettlementAckResponse>, AppError> {
    let ack = state.marketplace.ingest_settlement(req.into())?;
    Ok(Json(SettlementAckResponse {
        ack: ack.as_str().to_string(),
    }))
}

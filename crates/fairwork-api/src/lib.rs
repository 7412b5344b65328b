//! # fairwork-api — Axum HTTP Surface for the Lifecycle Engine
//!
//! HTTP layer over the marketplace engine: job lifecycle, dispute
//! lifecycle, AI arbitration, and settlement ingestion.
//!
//! ## API Surface
//!
//! | Prefix                   | Module                  | Domain                  |
//! |--------------------------|-------------------------|-------------------------|
//! | `/v1/jobs/*`             | [`routes::jobs`]        | Job lifecycle           |
//! | `/v1/disputes/*`         | [`routes::disputes`]    | Disputes and arbitration|
//! | `/v1/settlement/events`  | [`routes::settlement`]  | On-chain confirmations  |
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) sit outside the body-limited API router so
/// they stay reachable regardless of payload middleware.
pub fn app(state: AppState) -> Router {
    // Body size limit: 2 MiB. Evidence documents live off-host behind
    // content references, so request bodies stay small.
    let api = Router::new()
        .merge(routes::jobs::router())
        .merge(routes::disputes::router())
        .merge(routes::settlement::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let probes = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(probes).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks that the marketplace lock is acquirable. A missing arbitration
/// router does not fail readiness: the service may intentionally run
/// without providers, in which case only the analyze route serves 503.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.marketplace.jobs();
    if state.arbiter.is_none() {
        tracing::debug!("readiness: no arbitration providers configured");
    }
    (StatusCode::OK, "ready")
}

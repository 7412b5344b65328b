//! # Shared Application State
//!
//! [`AppState`] holds the marketplace, the arbitration router, and the
//! juror pool behind `Arc`s. Cloning the state clones handles, not data;
//! every Axum handler sees the same records.

use std::sync::Arc;

use fairwork_arbiter::ArbitrationRouter;
use fairwork_engine::{JurorPool, Marketplace};

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    /// The authoritative job and dispute records.
    pub marketplace: Arc<Marketplace>,
    /// AI arbitration, when providers are configured. `None` serves 503 on
    /// the analyze route and leaves the rest of the API fully functional.
    pub arbiter: Option<Arc<ArbitrationRouter>>,
    /// Source of juror panels.
    pub juror_pool: Arc<dyn JurorPool>,
}

impl AppState {
    /// Assemble state from its collaborators.
    pub fn new(
        marketplace: Arc<Marketplace>,
        arbiter: Option<Arc<ArbitrationRouter>>,
        juror_pool: Arc<dyn JurorPool>,
    ) -> Self {
        Self {
            marketplace,
            arbiter,
            juror_pool,
        }
    }
}

//! The start/end round seam.
//!
//! Scoring candidates and submitting nomination extrinsics live
//! behind this trait; the controller only sequences the calls.

use std::sync::Arc;

use async_trait::async_trait;
use stakeround_chain::{EraIndex, Target};
use tracing::{info, warn};

use crate::config::NominatorGroup;
use crate::store::RoundStateStore;

/// Everything a round start needs from the decision path.
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Era the eligibility decision was made against.
    pub current_era: EraIndex,

    /// Groups participating in this round.
    pub groups: Vec<NominatorGroup>,

    /// Combined targets observed across all groups before the round.
    pub current_targets: Vec<Target>,
}

/// Everything a round end needs from the decision path.
#[derive(Debug, Clone)]
pub struct EndRequest {
    /// Groups whose active round is being finalized.
    pub groups: Vec<NominatorGroup>,
}

/// Finalizes the previous round and begins the next one.
#[async_trait]
pub trait RoundActions: Send + Sync {
    /// Begin a new nomination round.
    async fn start_round(&self, request: StartRequest) -> anyhow::Result<()>;

    /// Finalize the round currently in flight.
    async fn end_round(&self, request: EndRequest) -> anyhow::Result<()>;
}

/// Shipped executor: records round bookkeeping in the store.
///
/// Persists the last nominated era before the next invocation can
/// read it, and refreshes the per-group target records. Target
/// scoring and extrinsic submission plug in here.
pub struct NominationExecutor {
    store: Arc<RoundStateStore>,
}

impl NominationExecutor {
    pub fn new(store: Arc<RoundStateStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RoundActions for NominationExecutor {
    async fn start_round(&self, request: StartRequest) -> anyhow::Result<()> {
        info!(
            current_era = request.current_era,
            groups = request.groups.len(),
            "Starting nomination round"
        );

        self.store
            .set_last_nominated_era_index(request.current_era)?;

        for group in &request.groups {
            self.store
                .replace_current_targets(&group.bonded_address, &request.current_targets)?;
        }

        Ok(())
    }

    async fn end_round(&self, request: EndRequest) -> anyhow::Result<()> {
        info!(groups = request.groups.len(), "Ending nomination round");

        for group in &request.groups {
            if let Err(e) = self.store.clear_current_targets(&group.bonded_address) {
                warn!(
                    bonded_address = %group.bonded_address,
                    error = %e,
                    "Failed to clear recorded targets"
                );
            }
        }

        Ok(())
    }
}

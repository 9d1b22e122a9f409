//! Era-round decision and orchestration.
//!
//! Once per tick the controller decides whether a new nomination
//! round is due, and if so ends the previous round (when one is
//! active) and starts the next. All failure paths are absorbed and
//! logged; the driver re-invokes on its fixed cadence regardless.

use std::sync::Arc;

use stakeround_chain::{ChainStateReader, EraIndex, Target};
use stakeround_events::{ProgressEmitter, ProgressEvent};
use tracing::{debug, error, info, warn};

use crate::actions::{EndRequest, RoundActions, StartRequest};
use crate::config::{era_buffer, NominatorGroup};
use crate::lifecycle::RoundLifecycle;
use crate::store::RoundStateStore;

/// Job name carried by emitted progress events.
pub const JOB_NAME: &str = "nominator-round";

/// Whether a new round is due.
///
/// Signed arithmetic so an active era below the buffer cannot wrap.
pub fn is_eligible(last_nominated: EraIndex, active_era: EraIndex, era_buffer: u32) -> bool {
    (last_nominated as i64) <= (active_era as i64) - (era_buffer as i64)
}

/// Single-invocation round scheduler.
///
/// Collaborators are long-lived and injected; the controller owns
/// only the per-invocation decision.
pub struct RoundController {
    reader: Arc<dyn ChainStateReader>,
    store: Arc<RoundStateStore>,
    actions: Arc<dyn RoundActions>,
    emitter: ProgressEmitter,
    lifecycle: Arc<RoundLifecycle>,
    network_prefix: u16,
    nominating: bool,
    groups: Vec<NominatorGroup>,
}

impl RoundController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: Arc<dyn ChainStateReader>,
        store: Arc<RoundStateStore>,
        actions: Arc<dyn RoundActions>,
        emitter: ProgressEmitter,
        lifecycle: Arc<RoundLifecycle>,
        network_prefix: u16,
        nominating: bool,
        groups: Vec<NominatorGroup>,
    ) -> Self {
        Self {
            reader,
            store,
            actions,
            emitter,
            lifecycle,
            network_prefix,
            nominating,
            groups,
        }
    }

    /// Evaluate one round invocation.
    ///
    /// Never returns an error: a failed invocation is skipped and
    /// retried on the next tick.
    pub async fn run_round(&self) {
        let Some(guard) = self.lifecycle.try_begin() else {
            debug!(
                phase = %self.lifecycle.phase(),
                "Round already in flight, skipping invocation"
            );
            return;
        };

        let active_era = match self.reader.get_active_era_index().await {
            Ok(era) => era,
            Err(e) => {
                warn!(error = %e, "Failed to read active era, skipping round");
                return;
            }
        };

        let last_nominated = match self.store.get_last_nominated_era_index() {
            Ok(era) => era,
            Err(e) => {
                warn!(error = %e, "Failed to read last nominated era, skipping round");
                return;
            }
        };

        let buffer = era_buffer(self.network_prefix);
        if !is_eligible(last_nominated, active_era, buffer) {
            info!(
                active_era,
                last_nominated,
                era_buffer = buffer,
                "Not yet eligible for a new round"
            );
            return;
        }

        if !self.nominating {
            info!(active_era, "Eligible but nominating is disabled");
            return;
        }

        if self.groups.is_empty() {
            info!(active_era, "No nominator groups configured, nothing to do");
            return;
        }

        // One combined list across all groups: the decision criterion
        // is "is any round active", not per-group action.
        let mut current_targets: Vec<Target> = Vec::new();
        for group in &self.groups {
            let mut targets = self.reader.get_current_targets(&group.bonded_address).await;
            current_targets.append(&mut targets);
        }

        if current_targets.is_empty() {
            info!(active_era, "No active round found, starting fresh");
        } else {
            guard.mark_ending();
            info!(
                active_era,
                targets = current_targets.len(),
                "Active round found, ending it first"
            );
            if let Err(e) = self
                .actions
                .end_round(EndRequest {
                    groups: self.groups.clone(),
                })
                .await
            {
                // The new round starts regardless of the end outcome.
                warn!(error = %e, "End round failed");
            }
            guard.mark_starting();
        }

        if let Err(e) = self
            .actions
            .start_round(StartRequest {
                current_era: active_era,
                groups: self.groups.clone(),
                current_targets,
            })
            .await
        {
            error!(error = %e, "Start round failed");
        }

        // Groups are processed as one collective round.
        let processed = 1usize;
        let total = self.groups.len();
        let progress = (processed * 100 / total) as u8;
        self.emitter.emit(ProgressEvent::now(
            JOB_NAME,
            progress,
            format!("{processed}/{total} nominator groups"),
        ));
    }
}

//! stakeround scheduler
//!
//! Periodically evaluates the chain's active era and rotates validator
//! nominations when a new round is due.
//!
//! ## Architecture
//!
//! - **Driver Loop**: Invokes the round controller on a fixed cadence
//! - **RoundController**: Decides eligibility and sequences end/start
//! - **RoundStateStore**: Durable last-nominated-era and target records
//! - **ChainStateReader**: Read-only chain queries (HTTP gateway)
//! - **ProgressEmitter**: Fire-and-forget progress events for observers

use std::sync::Arc;

use anyhow::Result;
use stakeround_chain::{ChainStateReader, RpcChainReader};
use stakeround_events::ProgressEmitter;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stakeround_scheduler::actions::NominationExecutor;
use stakeround_scheduler::config::{self, Config};
use stakeround_scheduler::lifecycle::RoundLifecycle;
use stakeround_scheduler::round::RoundController;
use stakeround_scheduler::store::RoundStateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting stakeround scheduler");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        chain_url = %config.chain_url,
        network_prefix = config.network_prefix,
        era_buffer = config.era_buffer(),
        nominating = config.nominating,
        round_interval_secs = config.round_interval.as_secs(),
        "Configuration loaded"
    );

    let groups = match &config.groups_file {
        Some(path) => config::load_groups(path)?,
        None => Vec::new(),
    };
    info!(groups = groups.len(), "Nominator groups loaded");

    // Open durable round state
    let store = Arc::new(RoundStateStore::open(&config.db_path)?);

    // Chain reader: one health probe up front, then rely on the cadence
    let reader: Arc<dyn ChainStateReader> = Arc::new(RpcChainReader::new(config.chain_url.clone()));
    if let Err(e) = reader.check_connection().await {
        warn!(error = %e, "Chain gateway unreachable at startup, will retry per tick");
    }

    let emitter = ProgressEmitter::default();
    let lifecycle = RoundLifecycle::new();
    let actions = Arc::new(NominationExecutor::new(Arc::clone(&store)));

    let controller = RoundController::new(
        reader,
        store,
        actions,
        emitter,
        lifecycle,
        config.network_prefix,
        config.nominating,
        groups,
    );

    // Create shutdown channel
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let driver = tokio::spawn(async move {
        let mut ticks = tokio::time::interval(config.round_interval);
        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    controller.run_round().await;
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Driver loop shutting down");
                        break;
                    }
                }
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");

    let _ = shutdown_tx.send(true);
    let _ = driver.await;

    info!("Scheduler shutdown complete");
    Ok(())
}

//! Integration tests for the full round flow.
//!
//! These tests drive the real controller against the real executor
//! and an in-memory store, with a mock chain reader:
//! 1. An eligible tick starts a round and persists the era
//! 2. The next tick within the era buffer is a no-op
//! 3. Once the chain advances past the buffer, the active round is
//!    ended and a new one started

use std::sync::Arc;

use stakeround_chain::{ChainStateReader, MockChainReader, Target};
use stakeround_events::{ProgressEmitter, ProgressReceiver};
use tokio::sync::broadcast::error::TryRecvError;

use stakeround_scheduler::actions::{NominationExecutor, RoundActions};
use stakeround_scheduler::config::NominatorGroup;
use stakeround_scheduler::lifecycle::RoundLifecycle;
use stakeround_scheduler::round::RoundController;
use stakeround_scheduler::store::RoundStateStore;

struct Harness {
    reader: Arc<MockChainReader>,
    store: Arc<RoundStateStore>,
    emitter: ProgressEmitter,
    controller: RoundController,
}

fn harness(active_era: u32, network_prefix: u16, groups: Vec<NominatorGroup>) -> Harness {
    let reader = Arc::new(MockChainReader::new(active_era));
    let store = Arc::new(RoundStateStore::open_in_memory().unwrap());
    let emitter = ProgressEmitter::new(16);
    let actions = Arc::new(NominationExecutor::new(Arc::clone(&store)));

    let controller = RoundController::new(
        Arc::clone(&reader) as Arc<dyn ChainStateReader>,
        Arc::clone(&store),
        actions as Arc<dyn RoundActions>,
        emitter.clone(),
        RoundLifecycle::new(),
        network_prefix,
        true,
        groups,
    );

    Harness {
        reader,
        store,
        emitter,
        controller,
    }
}

fn group(address: &str) -> NominatorGroup {
    NominatorGroup {
        bonded_address: address.to_string(),
        label: None,
    }
}

fn drain(rx: &mut ProgressReceiver) -> usize {
    let mut count = 0;
    while rx.try_recv().is_ok() {
        count += 1;
    }
    count
}

#[tokio::test]
async fn test_round_runs_once_per_era_buffer() {
    let h = harness(100, 0, vec![group("addr1")]);
    let mut rx = h.emitter.subscribe();

    // First tick: eligible, no active round, starts fresh
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 100);
    assert_eq!(drain(&mut rx), 1);

    // Second tick in the same era: inside the buffer, no-op
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 100);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    // Chain advances one era: prefix 0 means buffer 1, eligible again
    h.reader.set_active_era(101);
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 101);
    assert_eq!(drain(&mut rx), 1);
}

#[tokio::test]
async fn test_active_round_is_ended_before_restart() {
    let h = harness(200, 0, vec![group("addr1")]);

    // The chain reports live nominations for the group
    h.reader.set_targets(
        "addr1",
        vec![Target {
            address: "val1".to_string(),
            name: Some("Validator One".to_string()),
            identity: None,
        }],
    );
    // The executor's previous round left target records behind
    h.store
        .replace_current_targets(
            "addr1",
            &[Target {
                address: "val_old".to_string(),
                name: None,
                identity: None,
            }],
        )
        .unwrap();

    h.controller.run_round().await;

    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 200);
    // End cleared the stale records, start recorded the observed set
    let recorded = h.store.current_targets("addr1").unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].address, "val1");
}

#[tokio::test]
async fn test_four_era_buffer_on_non_zero_prefix() {
    let h = harness(100, 2, vec![group("addr1")]);
    let mut rx = h.emitter.subscribe();

    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 100);
    assert_eq!(drain(&mut rx), 1);

    // Three eras later: still inside the four-era buffer
    h.reader.set_active_era(103);
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 100);
    assert_eq!(drain(&mut rx), 0);

    // Four eras later: eligible
    h.reader.set_active_era(104);
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 104);
    assert_eq!(drain(&mut rx), 1);
}

#[tokio::test]
async fn test_chain_outage_skips_invocation_and_recovers() {
    let h = harness(300, 0, vec![group("addr1")]);
    let mut rx = h.emitter.subscribe();

    h.reader.set_era_query_fails(true);
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 0);
    assert_eq!(drain(&mut rx), 0);

    // Gateway comes back; the next tick proceeds normally
    h.reader.set_era_query_fails(false);
    h.controller.run_round().await;
    assert_eq!(h.store.get_last_nominated_era_index().unwrap(), 300);
    assert_eq!(drain(&mut rx), 1);
}

//! Mock chain reader for tests and offline development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ChainError;
use crate::reader::ChainStateReader;
use crate::types::{
    EraIndex, Exposure, Queried, RewardDestination, Target, ValidatorPrefs,
};

/// In-memory [`ChainStateReader`] with configurable responses and
/// call counters.
#[derive(Debug, Default)]
pub struct MockChainReader {
    active_era: AtomicU64,
    era_query_fails: AtomicBool,
    targets: Mutex<HashMap<String, Vec<Target>>>,
    era_reads: AtomicU64,
    target_reads: AtomicU64,
}

impl MockChainReader {
    pub fn new(active_era: EraIndex) -> Self {
        Self {
            active_era: AtomicU64::new(active_era as u64),
            ..Default::default()
        }
    }

    /// Set the era returned by subsequent queries.
    pub fn set_active_era(&self, era: EraIndex) {
        self.active_era.store(era as u64, Ordering::SeqCst);
    }

    /// Make era queries fail until cleared.
    pub fn set_era_query_fails(&self, fails: bool) {
        self.era_query_fails.store(fails, Ordering::SeqCst);
    }

    /// Set the targets returned for a bonded address.
    pub fn set_targets(&self, bonded_address: &str, targets: Vec<Target>) {
        self.targets
            .lock()
            .unwrap()
            .insert(bonded_address.to_string(), targets);
    }

    /// Number of era queries issued so far.
    pub fn era_reads(&self) -> u64 {
        self.era_reads.load(Ordering::SeqCst)
    }

    /// Number of target queries issued so far.
    pub fn target_reads(&self) -> u64 {
        self.target_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainStateReader for MockChainReader {
    async fn check_connection(&self) -> Result<(), ChainError> {
        if self.era_query_fails.load(Ordering::SeqCst) {
            return Err(ChainError::Unreachable("mock offline".into()));
        }
        Ok(())
    }

    async fn get_active_era_index(&self) -> Result<EraIndex, ChainError> {
        self.era_reads.fetch_add(1, Ordering::SeqCst);
        if self.era_query_fails.load(Ordering::SeqCst) {
            return Err(ChainError::Unreachable("mock offline".into()));
        }
        Ok(self.active_era.load(Ordering::SeqCst) as EraIndex)
    }

    async fn get_current_targets(&self, bonded_address: &str) -> Vec<Target> {
        self.target_reads.fetch_add(1, Ordering::SeqCst);
        self.targets
            .lock()
            .unwrap()
            .get(bonded_address)
            .cloned()
            .unwrap_or_default()
    }

    async fn get_validator_prefs(
        &self,
        _validator: &str,
        _era: EraIndex,
    ) -> Result<Queried<ValidatorPrefs>, ChainError> {
        Ok(Queried::missing(
            ValidatorPrefs {
                commission: 0,
                blocked: false,
            },
            "no validator prefs found",
        ))
    }

    async fn get_bonded_amount(&self, _stash: &str) -> Result<Queried<u128>, ChainError> {
        Ok(Queried::missing(0, "empty ledger"))
    }

    async fn get_exposure(
        &self,
        _validator: &str,
        _era: EraIndex,
    ) -> Result<Queried<Exposure>, ChainError> {
        Ok(Queried::missing(
            Exposure {
                total: 0,
                own: 0,
                others: Vec::new(),
            },
            "no exposure recorded for era",
        ))
    }

    async fn get_reward_destination(
        &self,
        _stash: &str,
    ) -> Result<Queried<RewardDestination>, ChainError> {
        Ok(Queried::missing(
            RewardDestination::None,
            "no reward destination set",
        ))
    }

    async fn get_queued_session_keys(
        &self,
        _validator: &str,
    ) -> Result<Queried<String>, ChainError> {
        Ok(Queried::missing(String::new(), "no queued session keys"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_era_and_failure_injection() {
        let reader = MockChainReader::new(100);
        assert_eq!(reader.get_active_era_index().await.unwrap(), 100);

        reader.set_era_query_fails(true);
        assert!(reader.get_active_era_index().await.is_err());
        assert!(reader.check_connection().await.is_err());

        assert_eq!(reader.era_reads(), 2);
    }

    #[tokio::test]
    async fn test_mock_targets_default_empty() {
        let reader = MockChainReader::new(1);
        assert!(reader.get_current_targets("unknown").await.is_empty());

        reader.set_targets(
            "addr1",
            vec![Target {
                address: "val1".into(),
                name: None,
                identity: None,
            }],
        );
        assert_eq!(reader.get_current_targets("addr1").await.len(), 1);
        assert_eq!(reader.target_reads(), 2);
    }
}

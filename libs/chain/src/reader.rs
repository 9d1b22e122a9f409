//! The read-only chain state interface consumed by the scheduler.

use async_trait::async_trait;

use crate::error::ChainError;
use crate::types::{
    EraIndex, Exposure, Queried, RewardDestination, Target, ValidatorPrefs,
};

/// Read-only access to current chain era and per-era staking facts.
///
/// Implementations must never panic across this boundary: every
/// failure is an explicit error or an empty result, because the
/// scheduler treats absence-of-error as the only safe-to-proceed
/// signal.
#[async_trait]
pub trait ChainStateReader: Send + Sync {
    /// Single connection-health probe. No retries.
    async fn check_connection(&self) -> Result<(), ChainError>;

    /// The chain's active era index.
    async fn get_active_era_index(&self) -> Result<EraIndex, ChainError>;

    /// Validators currently nominated by a bonded account.
    ///
    /// Query failures are absorbed to an empty list (logged by the
    /// implementation); an empty list means "no active nominations".
    async fn get_current_targets(&self, bonded_address: &str) -> Vec<Target>;

    /// Validator preferences for an era. Defaults with a reason when
    /// the validator has no prefs recorded.
    async fn get_validator_prefs(
        &self,
        validator: &str,
        era: EraIndex,
    ) -> Result<Queried<ValidatorPrefs>, ChainError>;

    /// Amount bonded by a stash account. Defaults to zero with a
    /// reason when the ledger is empty.
    async fn get_bonded_amount(&self, stash: &str) -> Result<Queried<u128>, ChainError>;

    /// Stake backing a validator in an era.
    async fn get_exposure(
        &self,
        validator: &str,
        era: EraIndex,
    ) -> Result<Queried<Exposure>, ChainError>;

    /// Where a staker directs rewards.
    async fn get_reward_destination(
        &self,
        stash: &str,
    ) -> Result<Queried<RewardDestination>, ChainError>;

    /// Session keys queued for the next session, hex-encoded.
    async fn get_queued_session_keys(
        &self,
        validator: &str,
    ) -> Result<Queried<String>, ChainError>;
}

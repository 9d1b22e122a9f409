//! Chain-side data types consumed by the scheduler.

use serde::{Deserialize, Serialize};

/// Index of a staking era. Monotonically non-decreasing as observed
/// from the chain; never mutated locally.
pub type EraIndex = u32;

/// A validator currently nominated by a bonded account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Validator stash address.
    pub address: String,

    /// On-chain display name, if registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identity of the controlling entity, if registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

/// A queried value together with an optional "why this is a default"
/// reason.
///
/// Distinguishes a genuine zero from an absent answer: `reason` is
/// `None` when the chain returned the value, and names the gap
/// ("no validator prefs found", "empty ledger") when it did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queried<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<T> Queried<T> {
    /// A value the chain actually returned.
    pub fn known(value: T) -> Self {
        Self {
            value,
            reason: None,
        }
    }

    /// A default standing in for data the chain did not have.
    pub fn missing(default: T, reason: impl Into<String>) -> Self {
        Self {
            value: default,
            reason: Some(reason.into()),
        }
    }

    /// True when the chain returned this value.
    pub fn is_known(&self) -> bool {
        self.reason.is_none()
    }
}

/// Validator preferences for an era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorPrefs {
    /// Commission in parts per billion.
    pub commission: u32,

    /// Whether the validator is blocking new nominations.
    #[serde(default)]
    pub blocked: bool,
}

/// One nominator's share of a validator's backing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualExposure {
    pub who: String,
    pub value: u128,
}

/// Total stake backing a validator in a given era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub total: u128,
    pub own: u128,
    #[serde(default)]
    pub others: Vec<IndividualExposure>,
}

/// Where a staker directs era rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardDestination {
    Staked,
    Stash,
    Controller,
    Account(String),
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queried_known_vs_missing() {
        let known = Queried::known(42u32);
        assert!(known.is_known());
        assert_eq!(known.value, 42);

        let missing = Queried::missing(0u32, "no validator prefs found");
        assert!(!missing.is_known());
        assert_eq!(missing.value, 0);
        assert_eq!(missing.reason.as_deref(), Some("no validator prefs found"));
    }

    #[test]
    fn test_target_deserializes_without_identity() {
        let json = r#"{"address": "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"}"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert!(target.name.is_none());
        assert!(target.identity.is_none());
    }

    #[test]
    fn test_reward_destination_serialization() {
        assert_eq!(
            serde_json::to_string(&RewardDestination::Staked).unwrap(),
            "\"staked\""
        );
        let json = serde_json::to_string(&RewardDestination::Account("addr".into())).unwrap();
        assert!(json.contains("account"));
    }
}

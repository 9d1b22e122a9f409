//! HTTP chain gateway client.
//!
//! Talks to a sidecar-style REST gateway in front of the chain node.
//! Every query is a single request; retry policy belongs to the
//! caller's cadence, not this client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ChainError;
use crate::reader::ChainStateReader;
use crate::types::{
    EraIndex, Exposure, Queried, RewardDestination, Target, ValidatorPrefs,
};

/// Chain gateway API client.
pub struct RpcChainReader {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ActiveEraResponse {
    era_index: EraIndex,
}

#[derive(Debug, Deserialize)]
struct BondedResponse {
    amount: u128,
}

#[derive(Debug, Deserialize)]
struct PayeeResponse {
    destination: RewardDestination,
}

#[derive(Debug, Deserialize)]
struct QueuedKeysResponse {
    keys: String,
}

impl RpcChainReader {
    /// Create a new reader against the given gateway base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// GET a JSON payload, mapping non-success statuses to `ChainError`.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ChainError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Chain gateway query");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Status { status, body });
        }

        Ok(response.json().await?)
    }

    /// GET a JSON payload where 404 means "the chain has no data",
    /// returned as `Ok(None)` rather than an error.
    async fn get_optional_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ChainError> {
        match self.get_json(path).await {
            Ok(value) => Ok(Some(value)),
            Err(ChainError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ChainStateReader for RpcChainReader {
    async fn check_connection(&self) -> Result<(), ChainError> {
        let url = format!("{}/v1/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Status { status, body });
        }

        Ok(())
    }

    async fn get_active_era_index(&self) -> Result<EraIndex, ChainError> {
        let era: ActiveEraResponse = self.get_json("/v1/staking/active-era").await?;
        Ok(era.era_index)
    }

    async fn get_current_targets(&self, bonded_address: &str) -> Vec<Target> {
        let path = format!("/v1/nominators/{}/targets", bonded_address);
        match self.get_optional_json::<Vec<Target>>(&path).await {
            Ok(Some(targets)) => targets,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(
                    bonded_address,
                    error = %e,
                    "Failed to fetch current targets, treating as empty"
                );
                Vec::new()
            }
        }
    }

    async fn get_validator_prefs(
        &self,
        validator: &str,
        era: EraIndex,
    ) -> Result<Queried<ValidatorPrefs>, ChainError> {
        let path = format!("/v1/validators/{}/prefs?era={}", validator, era);
        match self.get_optional_json::<ValidatorPrefs>(&path).await? {
            Some(prefs) => Ok(Queried::known(prefs)),
            None => Ok(Queried::missing(
                ValidatorPrefs {
                    commission: 0,
                    blocked: false,
                },
                "no validator prefs found",
            )),
        }
    }

    async fn get_bonded_amount(&self, stash: &str) -> Result<Queried<u128>, ChainError> {
        let path = format!("/v1/accounts/{}/bonded", stash);
        match self.get_optional_json::<BondedResponse>(&path).await? {
            Some(bonded) => Ok(Queried::known(bonded.amount)),
            None => Ok(Queried::missing(0, "empty ledger")),
        }
    }

    async fn get_exposure(
        &self,
        validator: &str,
        era: EraIndex,
    ) -> Result<Queried<Exposure>, ChainError> {
        let path = format!("/v1/validators/{}/exposure?era={}", validator, era);
        match self.get_optional_json::<Exposure>(&path).await? {
            Some(exposure) => Ok(Queried::known(exposure)),
            None => Ok(Queried::missing(
                Exposure {
                    total: 0,
                    own: 0,
                    others: Vec::new(),
                },
                "no exposure recorded for era",
            )),
        }
    }

    async fn get_reward_destination(
        &self,
        stash: &str,
    ) -> Result<Queried<RewardDestination>, ChainError> {
        let path = format!("/v1/accounts/{}/payee", stash);
        match self.get_optional_json::<PayeeResponse>(&path).await? {
            Some(payee) => Ok(Queried::known(payee.destination)),
            None => Ok(Queried::missing(
                RewardDestination::None,
                "no reward destination set",
            )),
        }
    }

    async fn get_queued_session_keys(
        &self,
        validator: &str,
    ) -> Result<Queried<String>, ChainError> {
        let path = format!("/v1/validators/{}/queued-keys", validator);
        match self.get_optional_json::<QueuedKeysResponse>(&path).await? {
            Some(queued) => Ok(Queried::known(queued.keys)),
            None => Ok(Queried::missing(String::new(), "no queued session keys")),
        }
    }
}

//! Configuration for the scheduler.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A bonded staking account that nominates independently of the
/// other groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatorGroup {
    /// Account that has locked funds and on whose behalf nominations
    /// are submitted.
    pub bonded_address: String,

    /// Operator-facing label for logs and dashboards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Scheduler configuration (env-driven).
#[derive(Debug, Clone)]
pub struct Config {
    /// Chain gateway base URL (example: http://127.0.0.1:8080).
    pub chain_url: String,

    /// SS58 network prefix; selects the era buffer.
    pub network_prefix: u16,

    /// Whether nominations may actually be rotated. Eligibility alone
    /// never authorizes action.
    pub nominating: bool,

    /// Interval between round evaluations.
    pub round_interval: Duration,

    /// SQLite path for round state.
    pub db_path: PathBuf,

    /// JSON file listing nominator groups.
    pub groups_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let chain_url = std::env::var("STAKEROUND_CHAIN_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        let network_prefix: u16 = std::env::var("STAKEROUND_NETWORK_PREFIX")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("STAKEROUND_NETWORK_PREFIX must be an integer.")?
            .unwrap_or(0);

        let nominating = std::env::var("STAKEROUND_NOMINATING")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let round_interval_secs: u64 = std::env::var("STAKEROUND_ROUND_INTERVAL_SECS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("STAKEROUND_ROUND_INTERVAL_SECS must be an integer.")?
            .unwrap_or(300);
        let round_interval = Duration::from_secs(round_interval_secs.max(1));

        let db_path = std::env::var("STAKEROUND_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/lib/stakeround/state.db"));

        let groups_file = std::env::var("STAKEROUND_GROUPS_FILE")
            .ok()
            .map(PathBuf::from);

        let log_level =
            std::env::var("STAKEROUND_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            chain_url,
            network_prefix,
            nominating,
            round_interval,
            db_path,
            groups_file,
            log_level,
        })
    }

    /// Minimum number of eras that must elapse since the last
    /// nomination before a new round is eligible.
    ///
    /// Prefix 0 (the relay chain) rotates every era; every other
    /// network waits four.
    pub fn era_buffer(&self) -> u32 {
        era_buffer(self.network_prefix)
    }
}

/// Era buffer for a network prefix.
pub fn era_buffer(network_prefix: u16) -> u32 {
    if network_prefix == 0 {
        1
    } else {
        4
    }
}

/// Load nominator groups from a JSON file.
pub fn load_groups(path: &Path) -> Result<Vec<NominatorGroup>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read groups file {}", path.display()))?;
    let groups: Vec<NominatorGroup> = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid groups file {}", path.display()))?;
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(2, 4)]
    #[case(42, 4)]
    fn test_era_buffer_by_prefix(#[case] prefix: u16, #[case] expected: u32) {
        assert_eq!(era_buffer(prefix), expected);
    }

    #[test]
    fn test_load_groups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(
            &path,
            r#"[
                {"bonded_address": "addr1", "label": "primary"},
                {"bonded_address": "addr2"}
            ]"#,
        )
        .unwrap();

        let groups = load_groups(&path).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label.as_deref(), Some("primary"));
        assert!(groups[1].label.is_none());
    }

    #[test]
    fn test_load_groups_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(load_groups(&path).is_err());
    }
}

//! # stakeround-chain
//!
//! Read-only access to chain state for the nomination scheduler:
//! the active era index, each nominator's current targets, and
//! per-era staking facts (commission, bonded amount, exposure,
//! reward destination, session keys).
//!
//! ## Design Principles
//!
//! - Pure queries; nothing here mutates chain or local state
//! - No operation panics across the boundary: every failure is an
//!   explicit error or an empty result
//! - Partial data carries a reason string so callers can tell
//!   "zero value" from "value unknown"

mod error;
mod mock;
mod reader;
mod rpc;
mod types;

pub use error::ChainError;
pub use mock::MockChainReader;
pub use reader::ChainStateReader;
pub use rpc::RpcChainReader;
pub use types::{
    EraIndex, Exposure, IndividualExposure, Queried, RewardDestination, Target, ValidatorPrefs,
};

//! stakeround scheduler library.
//!
//! Exposes the round decision-and-orchestration core so integration
//! tests and embedders can drive it without the binary.

pub mod actions;
pub mod config;
pub mod lifecycle;
pub mod round;
pub mod store;

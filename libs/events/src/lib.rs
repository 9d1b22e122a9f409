//! # stakeround-events
//!
//! Progress event definitions and the process-wide emitter for the
//! stakeround scheduler.
//!
//! ## Design Principles
//!
//! - Events are immutable records of scheduler progress
//! - Emission is fire-and-forget: no buffering beyond channel capacity,
//!   no retry, no delivery guarantee to subscribers
//! - A send with zero subscribers is not an error
//! - The emitter is an injected dependency, never ambient global state

mod emitter;
mod types;

pub use emitter::{ProgressEmitter, ProgressReceiver};
pub use types::{ProgressEvent, JOB_PROGRESS};

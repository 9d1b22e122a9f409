//! Round lifecycle state machine.
//!
//! The scheduler gets a single atomic may-I-proceed check; the guard
//! restores `Idle` on drop, so a failed invocation cannot wedge the
//! scheduler.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Phase of the round lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No round in flight; a new invocation may proceed.
    Idle,
    /// The previous round is being finalized.
    Ending,
    /// The next round is being started.
    Starting,
}

impl RoundPhase {
    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Ending => 1,
            Self::Starting => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Ending,
            2 => Self::Starting,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Ending => write!(f, "ending"),
            Self::Starting => write!(f, "starting"),
        }
    }
}

/// Cooperative re-entrancy guard for round invocations.
#[derive(Debug, Default)]
pub struct RoundLifecycle {
    phase: AtomicU8,
}

impl RoundLifecycle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current phase.
    pub fn phase(&self) -> RoundPhase {
        RoundPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    /// Attempt to begin an invocation.
    ///
    /// Succeeds only from `Idle`; returns `None` while a round is
    /// ending or starting.
    pub fn try_begin(&self) -> Option<RoundGuard<'_>> {
        let swapped = self.phase.compare_exchange(
            RoundPhase::Idle.as_u8(),
            RoundPhase::Starting.as_u8(),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );

        swapped.ok().map(|_| RoundGuard { lifecycle: self })
    }

    fn set(&self, phase: RoundPhase) {
        self.phase.store(phase.as_u8(), Ordering::SeqCst);
    }
}

/// Held for the duration of one invocation; restores `Idle` on drop.
#[derive(Debug)]
pub struct RoundGuard<'a> {
    lifecycle: &'a RoundLifecycle,
}

impl RoundGuard<'_> {
    /// Mark that the previous round is being finalized.
    pub fn mark_ending(&self) {
        self.lifecycle.set(RoundPhase::Ending);
    }

    /// Mark that the next round is being started.
    pub fn mark_starting(&self) {
        self.lifecycle.set(RoundPhase::Starting);
    }
}

impl Drop for RoundGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.set(RoundPhase::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_blocks_reentry() {
        let lifecycle = RoundLifecycle::new();
        assert_eq!(lifecycle.phase(), RoundPhase::Idle);

        let guard = lifecycle.try_begin().unwrap();
        assert_eq!(lifecycle.phase(), RoundPhase::Starting);

        // Re-entry refused while a round is in flight
        assert!(lifecycle.try_begin().is_none());

        guard.mark_ending();
        assert_eq!(lifecycle.phase(), RoundPhase::Ending);
        assert!(lifecycle.try_begin().is_none());

        drop(guard);
        assert_eq!(lifecycle.phase(), RoundPhase::Idle);
        assert!(lifecycle.try_begin().is_some());
    }

    #[test]
    fn test_guard_restores_idle_on_early_drop() {
        let lifecycle = RoundLifecycle::new();

        {
            let guard = lifecycle.try_begin().unwrap();
            guard.mark_ending();
            // Simulates an invocation aborted mid-flight
        }

        assert_eq!(lifecycle.phase(), RoundPhase::Idle);
    }
}

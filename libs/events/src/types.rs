//! Progress event payloads.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Event name that scheduler progress updates are published under.
pub const JOB_PROGRESS: &str = "jobProgress";

/// A single progress update from a scheduler job.
///
/// Emitted at most once per emission; consumers must not assume
/// delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Name of the job reporting progress.
    pub name: String,

    /// Completion percentage, 0-100.
    pub progress: u8,

    /// When the update was produced (Unix epoch milliseconds).
    pub updated: i64,

    /// Human-readable label for the iteration, e.g. "1/3 nominator groups".
    pub iteration: String,
}

impl ProgressEvent {
    /// Create a progress event stamped with the current time.
    ///
    /// `progress` is clamped to 100.
    pub fn now(name: impl Into<String>, progress: u8, iteration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            progress: progress.min(100),
            updated: Utc::now().timestamp_millis(),
            iteration: iteration.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_event_serialization() {
        let event = ProgressEvent {
            name: "nominator-round".to_string(),
            progress: 33,
            updated: 1_700_000_000_000,
            iteration: "1/3 nominator groups".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"progress\":33"));
        assert!(json.contains("\"iteration\":\"1/3 nominator groups\""));

        let back: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_progress_clamped() {
        let event = ProgressEvent::now("job", 250, "1/1 groups");
        assert_eq!(event.progress, 100);
        assert!(event.updated > 0);
    }
}

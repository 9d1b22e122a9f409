//! Error types for chain queries.

use thiserror::Error;

/// Errors from the chain query layer.
///
/// All variants mean "this query did not produce a usable answer";
/// callers only inspect error-presence, never the subtype.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The chain gateway could not be reached.
    #[error("chain gateway unreachable: {0}")]
    Unreachable(String),

    /// The gateway answered with a non-success status.
    #[error("chain query failed: {status} - {body}")]
    Status { status: u16, body: String },

    /// The gateway answered with a body we could not interpret.
    #[error("bad chain response: {0}")]
    BadResponse(String),
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ChainError::Unreachable(err.to_string())
        } else {
            ChainError::BadResponse(err.to_string())
        }
    }
}

//! Error types for the ETA engine

use crate::tracker::Generation;

/// ETA engine errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EtaError {
    /// Date pattern is not a valid strftime pattern
    #[error("invalid ETA date format '{pattern}'")]
    InvalidFormat { pattern: String },

    /// Completion reported for a request that was never issued
    #[error("ETA request {generation} was never issued (latest is {latest})")]
    UnknownGeneration {
        generation: Generation,
        latest: Generation,
    },
}

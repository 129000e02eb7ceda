//! Error types for the board
//!
//! Provides error handling for:
//! - External call failures (ticket store, ETA service)
//! - Transition execution (no selection, illegal target, overlapping commits)

use crate::driver::DriverPhase;
use tb_workflow::{Persona, Stage};

/// Failure reported by an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Service could not be reached
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Service refused the request
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Call did not finish in time
    #[error("operation timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },
}

impl CollaboratorError {
    /// Whether re-issuing the same call may succeed
    ///
    /// The board never retries on its own; this only informs the caller.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout { .. })
    }
}

/// Main board error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    /// Commit or cancel without a selected ticket
    #[error("no ticket is selected")]
    NoSelection,

    /// Ticket id is not in the current list
    #[error("ticket '{0}' is not on the board")]
    TicketNotFound(String),

    /// Target is not among the options offered for the ticket
    #[error("'{ticket}' cannot move from '{from}' to '{to}' as {persona}")]
    IllegalTransition {
        ticket: String,
        from: Stage,
        to: Stage,
        persona: Persona,
    },

    /// A commit is still waiting for the store
    #[error("transition of '{ticket}' is still being committed")]
    TransitionInProgress { ticket: String },

    /// Driver asked to move between phases that are not connected
    #[error("invalid driver phase change {from:?} -> {to:?}")]
    InvalidPhase { from: DriverPhase, to: DriverPhase },

    /// Ticket list could not be fetched
    #[error("failed to fetch tickets: {0}")]
    FetchFailed(#[source] CollaboratorError),

    /// Store refused the stage update
    #[error("failed to move '{ticket}' to '{stage}': {source}")]
    UpdateFailed {
        ticket: String,
        stage: Stage,
        #[source]
        source: CollaboratorError,
    },
}

impl BoardError {
    /// Whether the error came from an external call
    #[inline]
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::FetchFailed(_) | Self::UpdateFailed { .. })
    }
}

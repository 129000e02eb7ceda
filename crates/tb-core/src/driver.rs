//! Transition execution state machine
//!
//! Phases of a single stage change:
//!
//! ```text
//! Idle -> Selecting -> ChoosingTarget -> Committing -> Idle
//!            |               |
//!            +---------------+-----> Idle (cancel / nothing to offer)
//! ```
//!
//! A commit ends in `Idle` whether the store accepted it or not; retrying
//! means selecting the ticket again.

use crate::error::BoardError;
use tb_eta::Ticket;
use tb_workflow::{Persona, Stage, TransitionOption, Workflow};

/// Driver phase, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverPhase {
    Idle,
    Selecting,
    ChoosingTarget,
    Committing,
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: DriverPhase) -> Vec<DriverPhase> {
    use DriverPhase::*;
    match from {
        Idle => vec![Selecting],
        Selecting => vec![ChoosingTarget, Idle],
        ChoosingTarget => vec![Committing, Selecting, Idle],
        Committing => vec![Idle],
    }
}

/// Check a single phase change
///
/// # Errors
/// `BoardError::InvalidPhase` when `to` is not reachable from `from`.
pub fn validate_transition(from: DriverPhase, to: DriverPhase) -> Result<(), BoardError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(BoardError::InvalidPhase { from, to })
    }
}

/// Options offered for the selected ticket, as two separate groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateOptions {
    pub advance: Vec<TransitionOption>,
    pub backtrack: Vec<TransitionOption>,
}

impl CandidateOptions {
    /// Resolve both groups for a ticket in `stage`
    #[must_use]
    pub fn resolve(workflow: &Workflow, stage: &Stage, persona: Persona) -> Self {
        Self {
            advance: workflow.advance_options(stage.as_str(), persona),
            backtrack: workflow.backtrack_options(stage.as_str(), persona),
        }
    }

    /// Whether `target` is one of the offered options
    #[must_use]
    pub fn offers(&self, target: &str) -> bool {
        self.iter().any(|o| o.target == target)
    }

    /// Advance options followed by backtrack options
    pub fn iter(&self) -> impl Iterator<Item = &TransitionOption> {
        self.advance.iter().chain(self.backtrack.iter())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advance.is_empty() && self.backtrack.is_empty()
    }
}

/// Current transition state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TransitionState {
    #[default]
    Idle,
    /// A ticket was picked; options not yet resolved
    Selecting { ticket_id: String },
    /// Options are shown for the ticket
    ChoosingTarget {
        ticket_id: String,
        from: Stage,
        persona: Persona,
        options: CandidateOptions,
    },
    /// Waiting for the store
    Committing {
        ticket_id: String,
        from: Stage,
        target: Stage,
    },
}

impl TransitionState {
    #[must_use]
    pub fn phase(&self) -> DriverPhase {
        match self {
            Self::Idle => DriverPhase::Idle,
            Self::Selecting { .. } => DriverPhase::Selecting,
            Self::ChoosingTarget { .. } => DriverPhase::ChoosingTarget,
            Self::Committing { .. } => DriverPhase::Committing,
        }
    }

    /// Ticket this transition is about, if any
    #[must_use]
    pub fn ticket_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Selecting { ticket_id }
            | Self::ChoosingTarget { ticket_id, .. }
            | Self::Committing { ticket_id, .. } => Some(ticket_id),
        }
    }
}

/// Pending commit handed to the caller for execution against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub ticket_id: String,
    pub from: Stage,
    pub target: Stage,
}

/// Drives one transition at a time through its phases
#[derive(Debug, Default)]
pub struct TransitionDriver {
    state: TransitionState,
}

impl TransitionDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> DriverPhase {
        self.state.phase()
    }

    fn move_to(&mut self, next: TransitionState) -> Result<(), BoardError> {
        validate_transition(self.phase(), next.phase())?;
        self.state = next;
        Ok(())
    }

    /// Pick a ticket and resolve its options
    ///
    /// Re-selecting while options are shown switches tickets. A ticket that
    /// is not in `tickets` leaves the driver `Idle`.
    ///
    /// # Errors
    /// `TransitionInProgress` while committing, `TicketNotFound` for an
    /// unknown id.
    pub fn select(
        &mut self,
        ticket_id: &str,
        tickets: &[Ticket],
        workflow: &Workflow,
        persona: Persona,
    ) -> Result<&CandidateOptions, BoardError> {
        if let TransitionState::Committing { ticket_id, .. } = &self.state {
            return Err(BoardError::TransitionInProgress {
                ticket: ticket_id.clone(),
            });
        }
        self.move_to(TransitionState::Selecting {
            ticket_id: ticket_id.to_string(),
        })?;

        let Some(ticket) = tickets.iter().find(|t| t.id == ticket_id) else {
            self.state = TransitionState::Idle;
            return Err(BoardError::TicketNotFound(ticket_id.to_string()));
        };

        let options = CandidateOptions::resolve(workflow, &ticket.stage, persona);
        if options.is_empty() {
            tracing::debug!(ticket = %ticket_id, stage = %ticket.stage, "no legal moves");
        }
        self.move_to(TransitionState::ChoosingTarget {
            ticket_id: ticket_id.to_string(),
            from: ticket.stage.clone(),
            persona,
            options,
        })?;

        match &self.state {
            TransitionState::ChoosingTarget { options, .. } => Ok(options),
            _ => Err(BoardError::NoSelection),
        }
    }

    /// Options currently on display
    #[must_use]
    pub fn options(&self) -> Option<&CandidateOptions> {
        match &self.state {
            TransitionState::ChoosingTarget { options, .. } => Some(options),
            _ => None,
        }
    }

    /// Close the selection without committing
    ///
    /// # Errors
    /// `TransitionInProgress` while committing; cancelling from `Idle` is a
    /// no-op.
    pub fn cancel(&mut self) -> Result<(), BoardError> {
        match &self.state {
            TransitionState::Idle => Ok(()),
            TransitionState::Committing { ticket_id, .. } => {
                Err(BoardError::TransitionInProgress {
                    ticket: ticket_id.clone(),
                })
            }
            _ => self.move_to(TransitionState::Idle),
        }
    }

    /// Start committing `target`
    ///
    /// The target must be one of the offered options. An illegal target
    /// closes the selection and is reported without entering `Committing`.
    ///
    /// # Errors
    /// `NoSelection`, `TransitionInProgress` or `IllegalTransition`.
    pub fn begin_commit(&mut self, target: &str) -> Result<PendingCommit, BoardError> {
        let (ticket_id, from, persona, legal) = match &self.state {
            TransitionState::Idle | TransitionState::Selecting { .. } => {
                return Err(BoardError::NoSelection)
            }
            TransitionState::Committing { ticket_id, .. } => {
                return Err(BoardError::TransitionInProgress {
                    ticket: ticket_id.clone(),
                })
            }
            TransitionState::ChoosingTarget {
                ticket_id,
                from,
                persona,
                options,
            } => (ticket_id.clone(), from.clone(), *persona, options.offers(target)),
        };

        if !legal {
            self.state = TransitionState::Idle;
            tracing::warn!(
                ticket = %ticket_id,
                stage = %from,
                to = target,
                %persona,
                "rejected illegal transition"
            );
            return Err(BoardError::IllegalTransition {
                ticket: ticket_id,
                from,
                to: Stage::from(target),
                persona,
            });
        }

        let pending = PendingCommit {
            ticket_id,
            from,
            target: Stage::from(target),
        };
        self.move_to(TransitionState::Committing {
            ticket_id: pending.ticket_id.clone(),
            from: pending.from.clone(),
            target: pending.target.clone(),
        })?;
        Ok(pending)
    }

    /// Commit finished (either way); back to `Idle`
    ///
    /// # Errors
    /// `NoSelection` when nothing was being committed.
    pub fn finish_commit(&mut self) -> Result<(), BoardError> {
        if self.phase() != DriverPhase::Committing {
            return Err(BoardError::NoSelection);
        }
        self.move_to(TransitionState::Idle)
    }

    /// Give up on an outstanding commit without knowing its outcome
    ///
    /// Returns whether a commit was outstanding.
    pub fn abandon_commit(&mut self) -> bool {
        if let TransitionState::Committing { ticket_id, target, .. } = &self.state {
            tracing::warn!(
                ticket = %ticket_id,
                stage = %target,
                "commit abandoned before the store answered; refresh to see the stored stage"
            );
            self.state = TransitionState::Idle;
            true
        } else {
            false
        }
    }
}

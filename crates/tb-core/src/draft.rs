//! Defaults for the ticket creation form

use serde::Serialize;
use tb_eta::Ticket;
use tb_workflow::{Stage, Workflow};

/// Priority a new ticket starts with
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Prefilled values for a new ticket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDraft {
    pub stage: Stage,
    pub priority: String,
    pub active: bool,
    pub sort_order: f64,
}

impl TicketDraft {
    /// Draft placed after every ticket currently on the board
    ///
    /// Sort order is one past the highest existing value, or 1 when no
    /// ticket has one.
    #[must_use]
    pub fn for_board(workflow: &Workflow, tickets: &[Ticket]) -> Self {
        let sort_order = tickets
            .iter()
            .filter_map(|t| t.sort_order)
            .fold(None, |max: Option<f64>, n| Some(max.map_or(n, |m| m.max(n))))
            .map_or(1.0, |max| max + 1.0);
        Self {
            stage: workflow.initial_stage().clone(),
            priority: DEFAULT_PRIORITY.to_string(),
            active: true,
            sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_ticket_gets_sort_order_one() {
        let wf = Workflow::bundled().unwrap();
        let draft = TicketDraft::for_board(&wf, &[Ticket::new("T1", "Backlog")]);
        assert_eq!(draft.sort_order, 1.0);
        assert_eq!(draft.stage, "Backlog");
        assert_eq!(draft.priority, "Medium");
        assert!(draft.active);
    }

    #[test]
    fn sort_order_follows_the_highest() {
        let wf = Workflow::bundled().unwrap();
        let tickets = [
            Ticket::new("T1", "Backlog").with_sort_order(3.0),
            Ticket::new("T2", "Backlog"),
            Ticket::new("T3", "Done").with_sort_order(12.0),
        ];
        assert_eq!(TicketDraft::for_board(&wf, &tickets).sort_order, 13.0);
    }
}

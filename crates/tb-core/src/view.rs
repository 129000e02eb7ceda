//! Board view builder
//!
//! Pure function of (state, workflow, enriched tickets) to a renderable view
//! model. Tickets are placed in every visible column that lists their stage,
//! keeping their relative order; a ticket whose stage no column lists is
//! omitted.

use crate::state::{AppState, DisplayMode, SizeMode};
use serde::Serialize;
use tb_eta::{EnrichedTicket, EtaDisplay, Ticket};
use tb_workflow::{solid_style, Persona, Workflow};

/// One card in a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketCard {
    pub ticket: Ticket,
    pub eta: EtaDisplay,
    /// Status color of the ticket's stage
    pub card_color: String,
}

/// One rendered column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub name: String,
    pub owner: Persona,
    pub header_color: String,
    pub header_style: String,
    pub cards: Vec<TicketCard>,
}

impl ColumnView {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Everything needed to render the board for one persona
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub persona: Persona,
    pub display_mode: DisplayMode,
    pub size_mode: SizeMode,
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Build the view for `state`
    #[must_use]
    pub fn build(workflow: &Workflow, tickets: &[EnrichedTicket], state: &AppState) -> Self {
        Self {
            persona: state.persona,
            display_mode: state.display_mode,
            size_mode: state.size_mode,
            columns: build_columns(workflow, tickets, state.persona, state.show_all_columns),
        }
    }

    /// Total cards across columns
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(ColumnView::len).sum()
    }

    /// Column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Columns for `persona`, filtered by `show_all`, with their cards
#[must_use]
pub fn build_columns(
    workflow: &Workflow,
    tickets: &[EnrichedTicket],
    persona: Persona,
    show_all: bool,
) -> Vec<ColumnView> {
    let palette = workflow.palette();
    workflow
        .visible_columns(persona, show_all)
        .into_iter()
        .map(|name| {
            let stages = workflow.column_stages(persona, name);
            let owner = workflow.column_owner(persona, name);
            let header_color = palette.owner_color(owner).to_string();
            let cards = tickets
                .iter()
                .filter(|t| stages.contains(&t.ticket.stage))
                .map(|t| TicketCard {
                    ticket: t.ticket.clone(),
                    eta: t.eta.clone(),
                    card_color: palette.stage_color(t.ticket.stage.as_str()).to_string(),
                })
                .collect();
            ColumnView {
                name: name.to_string(),
                owner,
                header_style: solid_style(&header_color),
                header_color,
                cards,
            }
        })
        .collect()
}

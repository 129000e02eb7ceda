//! Plain-text rendering of board views and transition options

use std::fmt::Write;
use tb_core::{BoardView, CandidateOptions, ColumnView, DisplayMode, TicketCard};
use tb_workflow::TransitionOption;

pub(crate) fn render_board(view: &BoardView) -> String {
    match view.display_mode {
        DisplayMode::Kanban => kanban(view),
        DisplayMode::Compact => compact(view),
        DisplayMode::Table => table(view),
    }
}

fn card_line(card: &TicketCard) -> String {
    let mut line = card.ticket.display_name().to_string();
    if let Some(priority) = &card.ticket.priority {
        let _ = write!(line, " [{priority}]");
    }
    let _ = write!(line, "  ETA {}", card.eta);
    line
}

fn header(column: &ColumnView) -> String {
    format!("{} ({}, {}) {}", column.name, column.owner, column.header_color, column.len())
}

fn kanban(view: &BoardView) -> String {
    let mut out = format!("Board for {}\n", view.persona);
    for column in &view.columns {
        let _ = writeln!(out, "\n== {}", header(column));
        if column.is_empty() {
            out.push_str("   (empty)\n");
        }
        for card in &column.cards {
            let _ = writeln!(out, "   - {}", card_line(card));
        }
    }
    out
}

fn compact(view: &BoardView) -> String {
    let mut out = String::new();
    for column in &view.columns {
        let names: Vec<&str> = column.cards.iter().map(|c| c.ticket.display_name()).collect();
        let _ = writeln!(out, "{} [{}]: {}", column.name, column.len(), names.join(", "));
    }
    out
}

fn table(view: &BoardView) -> String {
    let rows: Vec<[&str; 4]> = view
        .columns
        .iter()
        .flat_map(|column| {
            column.cards.iter().map(move |card| {
                [
                    column.name.as_str(),
                    card.ticket.display_name(),
                    card.ticket.stage.as_str(),
                    card.eta.as_str(),
                ]
            })
        })
        .collect();

    let titles = ["Column", "Ticket", "Stage", "ETA"];
    let mut widths = titles.map(|t| t.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&titles).chain(rows.iter()) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
    }
    out
}

fn option_line(option: &TransitionOption) -> String {
    let focus = if option.autofocus { " *" } else { "" };
    format!("{} {}{}", option.icon, option.label, focus)
}

pub(crate) fn render_options(stage: &str, options: &CandidateOptions) -> String {
    let mut out = format!("From '{stage}':\n");
    for (title, group) in [("Advance", &options.advance), ("Backtrack", &options.backtrack)] {
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "  {title}:");
        for option in group {
            let _ = writeln!(out, "    {}", option_line(option));
        }
    }
    if options.is_empty() {
        out.push_str("  (no legal moves)\n");
    }
    out
}

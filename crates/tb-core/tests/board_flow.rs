use pretty_assertions::assert_eq;
use std::sync::Arc;
use tb_core::{AppState, Board, BoardError, DisplayMode, WorkerCount};
use tb_eta::{Completion, Ticket};
use tb_test_utils::{
    bundled_workflow, eta, overrides_workflow, sample_tickets, InMemoryTicketStore,
    StaticEtaService,
};
use tb_workflow::{Persona, Stage};

type TestBoard = Board<Arc<InMemoryTicketStore>, Arc<StaticEtaService>>;

fn bundled_board(persona: Persona) -> (TestBoard, Arc<InMemoryTicketStore>, Arc<StaticEtaService>) {
    let store = Arc::new(InMemoryTicketStore::new(sample_tickets()));
    let etas = Arc::new(StaticEtaService::new(vec![
        eta("a0B5g00000T1aaaEAA-extra", 2025, 7, 4),
        eta("a0B5g00000T2bbb", 2025, 7, 11),
    ]));
    let board = Board::new(bundled_workflow(), Arc::clone(&store), Arc::clone(&etas))
        .with_state(AppState::default().with_persona(persona));
    (board, store, etas)
}

#[tokio::test]
async fn refresh_joins_etas_into_the_view() {
    let (mut board, _, etas) = bundled_board(Persona::Developer);
    assert_eq!(board.refresh().await, Ok(4));
    assert_eq!(etas.calls(), [2]);

    let view = board.view();
    let in_dev = view.column("In Development").unwrap();
    assert_eq!(in_dev.cards[0].eta.as_str(), "7/4/2025");
    assert_eq!(in_dev.owner, Persona::Developer);

    let qa = bundled_board(Persona::QA).0;
    assert!(qa.view().columns.iter().all(|c| c.is_empty()));
}

#[tokio::test]
async fn unknown_eta_uses_sentinel() {
    let (mut board, _, _) = bundled_board(Persona::Client);
    board.refresh().await.unwrap();
    let view = board.view();
    let backlog = view.column("Backlog").unwrap();
    assert_eq!(backlog.cards[0].ticket.id, "a0B5g00000T3cccEAA");
    assert_eq!(backlog.cards[0].eta.as_str(), "—");
}

#[tokio::test]
async fn commit_round_trip_through_the_store() {
    let (mut board, store, _) = bundled_board(Persona::Developer);
    board.refresh().await.unwrap();

    let options = board.select_ticket("a0B5g00000T1aaaEAA").unwrap();
    assert!(options.offers("Dev Blocked"));
    board.commit("Dev Blocked").await.unwrap();

    assert_eq!(board.tickets()[0].stage, "Dev Blocked");
    assert_eq!(
        store.updates(),
        [("a0B5g00000T1aaaEAA".to_string(), Stage::from("Dev Blocked"))]
    );

    let view = board.view();
    let blocked = view.column("Dev Blocked").unwrap();
    assert_eq!(blocked.cards[0].card_color, board.workflow().palette().stage_color("Dev Blocked"));
}

#[tokio::test]
async fn rejected_update_keeps_stage() {
    let (mut board, store, _) = bundled_board(Persona::Developer);
    board.refresh().await.unwrap();
    store.set_fail_updates(true);

    board.select_ticket("a0B5g00000T1aaaEAA").unwrap();
    let err = board.commit("Dev Blocked").await.unwrap_err();
    assert!(err.is_external());
    assert_eq!(board.tickets()[0].stage, "In Development");

    // The selection is closed; committing again needs a new selection
    assert_eq!(board.commit("Dev Blocked").await, Err(BoardError::NoSelection));
}

#[tokio::test]
async fn eta_outage_still_joins_every_ticket() {
    let (mut board, _, etas) = bundled_board(Persona::Client);
    etas.set_fail(true);
    assert_eq!(board.refresh().await, Ok(4));

    let enriched = board.enriched_tickets();
    assert_eq!(enriched.len(), 4);
    assert!(enriched.iter().all(|t| !t.eta.is_known()));

    // The Client layout has no lane for "Done"
    let view = board.view();
    assert_eq!(view.card_count(), 3);
    assert!(view
        .columns
        .iter()
        .flat_map(|c| &c.cards)
        .all(|card| !card.eta.is_known()));
}

#[tokio::test]
async fn worker_count_feeds_the_eta_service() {
    let (mut board, _, etas) = bundled_board(Persona::Client);
    board.refresh().await.unwrap();
    etas.set_results(Vec::new());
    let completion = board.set_worker_count(WorkerCount::parse_lenient("0")).await;
    assert_eq!(completion, Completion::Applied { count: 0 });
    assert_eq!(etas.calls(), [2, 1]);
}

#[tokio::test]
async fn created_ticket_appears_after_refresh() {
    let (mut board, store, _) = bundled_board(Persona::Client);
    board.refresh().await.unwrap();
    let draft = board.create_defaults();
    assert_eq!(draft.sort_order, 3.0);

    store.insert(Ticket::new("a0B5g00000T5eeeEAA", draft.stage.clone()).with_sort_order(draft.sort_order));
    assert_eq!(board.on_ticket_created().await, Ok(5));
    assert_eq!(board.view().column("Backlog").unwrap().len(), 2);
}

#[tokio::test]
async fn persona_overrides_shape_the_options() {
    let store = Arc::new(InMemoryTicketStore::new(vec![
        Ticket::new("T1", "In Development"),
        Ticket::new("T2", "In QA"),
    ]));
    let etas = Arc::new(StaticEtaService::default());
    let mut board = Board::new(overrides_workflow(), store, etas)
        .with_state(AppState::default().with_persona(Persona::Developer));
    board.refresh().await.unwrap();

    let options = board.select_ticket("T1").unwrap().clone();
    let qa = options.advance.iter().find(|o| o.target == "In QA").unwrap();
    assert_eq!(qa.label, "Send to QA");
    assert!(qa.autofocus);
    board.cancel().unwrap();

    board.set_persona(Persona::QA);
    let options = board.select_ticket("T2").unwrap();
    let targets: Vec<&str> = options.backtrack.iter().map(|o| o.target.as_str()).collect();
    assert_eq!(targets, ["In Development", "Backlog"]);
    assert_eq!(options.backtrack[1].icon, "♻️");
    assert_eq!(options.backtrack[0].icon, "🔙");
}

#[tokio::test]
async fn display_mode_is_carried_but_grouping_is_stable() {
    let (mut board, _, _) = bundled_board(Persona::Consultant);
    board.refresh().await.unwrap();
    let kanban = board.view();
    board.set_display_mode(DisplayMode::Compact);
    board.set_show_all_columns(true);
    let compact = board.view();
    assert_eq!(compact.display_mode, DisplayMode::Compact);
    assert_eq!(kanban.columns, compact.columns);
}

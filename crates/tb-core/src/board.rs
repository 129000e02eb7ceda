//! Board orchestrator
//!
//! Owns the ticket list and the current ETA set, and is the single place
//! where either changes:
//! - `refresh` replaces the ticket list, then (strictly after) reloads ETAs
//! - ETA completions go through the [`EtaTracker`] so a superseded request
//!   can never overwrite a newer one
//! - a successful commit updates exactly one ticket in place; a failed one
//!   changes nothing
//!
//! Views are rebuilt on demand from the current state and never cached.

use crate::collaborators::{EtaService, TicketStore};
use crate::draft::TicketDraft;
use crate::driver::{CandidateOptions, TransitionDriver, TransitionState};
use crate::error::{BoardError, CollaboratorError};
use crate::state::{AppState, DisplayMode, SizeMode, WorkerCount};
use crate::view::BoardView;
use std::sync::Arc;
use tb_eta::{join, Completion, EnrichedTicket, EtaFormat, EtaResult, EtaTracker, Generation, Ticket};
use tb_workflow::{Persona, Workflow};

/// An ETA request that has been issued but not yet applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EtaRequest {
    pub generation: Generation,
    pub worker_count: WorkerCount,
}

/// Returns the driver to `Idle` if a commit future is dropped mid-flight
struct CommitGuard<'a> {
    driver: &'a mut TransitionDriver,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.driver.abandon_commit();
    }
}

/// Ticket board for one viewer
#[derive(Debug)]
pub struct Board<S, E> {
    workflow: Arc<Workflow>,
    store: S,
    eta_service: E,
    tickets: Vec<Ticket>,
    tracker: EtaTracker,
    state: AppState,
    driver: TransitionDriver,
    eta_format: EtaFormat,
}

impl<S: TicketStore, E: EtaService> Board<S, E> {
    /// Create an empty board; call [`refresh`](Self::refresh) to load it
    #[must_use]
    pub fn new(workflow: Arc<Workflow>, store: S, eta_service: E) -> Self {
        Self {
            workflow,
            store,
            eta_service,
            tickets: Vec::new(),
            tracker: EtaTracker::new(),
            state: AppState::default(),
            driver: TransitionDriver::new(),
            eta_format: EtaFormat::default(),
        }
    }

    /// Builder: initial viewer settings
    #[must_use]
    pub fn with_state(mut self, state: AppState) -> Self {
        self.state = state;
        self
    }

    /// Builder: ETA date pattern
    #[must_use]
    pub fn with_eta_format(mut self, format: EtaFormat) -> Self {
        self.eta_format = format;
        self
    }

    #[inline]
    #[must_use]
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    #[inline]
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn eta_results(&self) -> &[EtaResult] {
        self.tracker.results()
    }

    #[inline]
    #[must_use]
    pub fn transition_state(&self) -> &TransitionState {
        self.driver.state()
    }

    pub fn set_persona(&mut self, persona: Persona) {
        self.state.persona = persona;
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.state.display_mode = mode;
    }

    pub fn set_size_mode(&mut self, mode: SizeMode) {
        self.state.size_mode = mode;
    }

    pub fn set_show_all_columns(&mut self, show_all: bool) {
        self.state.show_all_columns = show_all;
    }

    /// Fetch tickets, then reload ETAs against the new list
    ///
    /// Returns the number of tickets now on the board. ETA failures are
    /// logged and never fail the refresh.
    ///
    /// # Errors
    /// `FetchFailed`; the previous ticket list is kept.
    pub async fn refresh(&mut self) -> Result<usize, BoardError> {
        let tickets = match self.store.fetch_tickets().await {
            Ok(tickets) => tickets,
            Err(err) => {
                tracing::warn!(error = %err, "ticket fetch failed; keeping current list");
                return Err(BoardError::FetchFailed(err));
            }
        };
        self.tickets = tickets;
        tracing::info!(count = self.tickets.len(), "ticket list refreshed");

        self.load_etas().await;
        Ok(self.tickets.len())
    }

    /// Issue an ETA request for the current worker count
    ///
    /// Pair with [`apply_eta_results`](Self::apply_eta_results) when the
    /// caller runs the computation itself (e.g. several in flight at once).
    pub fn begin_eta_request(&mut self) -> EtaRequest {
        EtaRequest {
            generation: self.tracker.begin(),
            worker_count: self.state.worker_count,
        }
    }

    /// Apply the outcome of an earlier [`EtaRequest`]
    ///
    /// Late results from a superseded request are discarded; a failure of the
    /// newest request leaves the board with no ETAs.
    pub fn apply_eta_results(
        &mut self,
        generation: Generation,
        outcome: Result<Vec<EtaResult>, CollaboratorError>,
    ) -> Completion {
        match self.tracker.complete(generation, outcome) {
            Ok(completion) => completion,
            Err(err) => {
                tracing::error!(error = %err, "ETA completion ignored");
                Completion::Stale
            }
        }
    }

    /// Compute and apply ETAs for the current worker count
    pub async fn load_etas(&mut self) -> Completion {
        let request = self.begin_eta_request();
        let outcome = self
            .eta_service
            .compute_etas(request.worker_count.get())
            .await;
        self.apply_eta_results(request.generation, outcome)
    }

    /// Change the worker count and reload ETAs
    pub async fn set_worker_count(&mut self, worker_count: WorkerCount) -> Completion {
        self.state.worker_count = worker_count;
        tracing::debug!(%worker_count, "worker count changed");
        self.load_etas().await
    }

    /// Tickets joined with the current ETA set
    #[must_use]
    pub fn enriched_tickets(&self) -> Vec<EnrichedTicket> {
        join(&self.tickets, self.tracker.results(), &self.eta_format)
    }

    /// Current board view
    #[must_use]
    pub fn view(&self) -> BoardView {
        BoardView::build(&self.workflow, &self.enriched_tickets(), &self.state)
    }

    /// Open the transition options for a ticket
    ///
    /// # Errors
    /// See [`TransitionDriver::select`].
    pub fn select_ticket(&mut self, ticket_id: &str) -> Result<&CandidateOptions, BoardError> {
        self.driver
            .select(ticket_id, &self.tickets, &self.workflow, self.state.persona)
    }

    /// Close the transition options
    ///
    /// # Errors
    /// `TransitionInProgress` while a commit is outstanding.
    pub fn cancel(&mut self) -> Result<(), BoardError> {
        self.driver.cancel()
    }

    /// Move the selected ticket to `target`
    ///
    /// The store is called only for an offered target. On success the
    /// matching ticket's stage is updated in place; on failure the list is
    /// left as it was. The selection is closed either way, also when the
    /// returned future is dropped before the store answers; the ticket list
    /// is then unchanged until the next refresh.
    ///
    /// # Errors
    /// `NoSelection`, `IllegalTransition` or `UpdateFailed`.
    pub async fn commit(&mut self, target: &str) -> Result<(), BoardError> {
        let pending = self.driver.begin_commit(target)?;
        let guard = CommitGuard {
            driver: &mut self.driver,
        };
        let outcome = self
            .store
            .update_ticket_stage(&pending.ticket_id, &pending.target)
            .await;
        guard.driver.finish_commit()?;
        drop(guard);

        match outcome {
            Ok(()) => {
                if let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == pending.ticket_id) {
                    ticket.stage = pending.target.clone();
                }
                tracing::info!(
                    ticket = %pending.ticket_id,
                    from = %pending.from,
                    stage = %pending.target,
                    "ticket moved"
                );
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    ticket = %pending.ticket_id,
                    stage = %pending.target,
                    error = %err,
                    "ticket stage update failed"
                );
                Err(BoardError::UpdateFailed {
                    ticket: pending.ticket_id,
                    stage: pending.target,
                    source: err,
                })
            }
        }
    }

    /// Prefilled values for the creation form
    #[must_use]
    pub fn create_defaults(&self) -> TicketDraft {
        TicketDraft::for_board(&self.workflow, &self.tickets)
    }

    /// Creation form reported success; reload the board
    ///
    /// # Errors
    /// See [`refresh`](Self::refresh).
    pub async fn on_ticket_created(&mut self) -> Result<usize, BoardError> {
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{MockEtaService, MockTicketStore};
    use crate::driver::DriverPhase;
    use tb_workflow::Stage;

    fn sample() -> Vec<Ticket> {
        vec![
            Ticket::new("T1", "In Development").with_sort_order(1.0),
            Ticket::new("T2", "Ready for QA").with_sort_order(2.0),
        ]
    }

    fn fetching_store() -> MockTicketStore {
        let mut store = MockTicketStore::new();
        store.expect_fetch_tickets().returning(|| Ok(sample()));
        store
    }

    fn empty_etas() -> MockEtaService {
        let mut etas = MockEtaService::new();
        etas.expect_compute_etas().returning(|_| Ok(Vec::new()));
        etas
    }

    fn board(store: MockTicketStore, etas: MockEtaService) -> Board<MockTicketStore, MockEtaService> {
        let workflow = Arc::new(Workflow::bundled().unwrap());
        Board::new(workflow, store, etas).with_state(AppState::default().with_persona(Persona::Developer))
    }

    #[tokio::test]
    async fn successful_commit_moves_only_the_selected_ticket() {
        let mut store = fetching_store();
        store
            .expect_update_ticket_stage()
            .withf(|id: &str, stage: &Stage| id == "T1" && *stage == "Dev Blocked")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut board = board(store, empty_etas());
        board.refresh().await.unwrap();

        board.select_ticket("T1").unwrap();
        board.commit("Dev Blocked").await.unwrap();

        assert_eq!(board.tickets()[0].stage, "Dev Blocked");
        assert_eq!(board.tickets()[1].stage, "Ready for QA");
        assert_eq!(board.transition_state(), &TransitionState::Idle);
    }

    #[tokio::test]
    async fn failed_commit_leaves_tickets_untouched() {
        let mut store = fetching_store();
        store
            .expect_update_ticket_stage()
            .returning(|_, _| Err(CollaboratorError::Rejected("locked".into())));
        let mut board = board(store, empty_etas());
        board.refresh().await.unwrap();

        board.select_ticket("T1").unwrap();
        let err = board.commit("Dev Blocked").await.unwrap_err();

        assert!(matches!(err, BoardError::UpdateFailed { .. }));
        assert_eq!(board.tickets(), sample().as_slice());
        assert_eq!(board.transition_state().phase(), DriverPhase::Idle);
    }

    #[tokio::test]
    async fn illegal_target_never_reaches_the_store() {
        let mut store = fetching_store();
        store.expect_update_ticket_stage().never();
        let mut board = board(store, empty_etas());
        board.refresh().await.unwrap();

        board.select_ticket("T1").unwrap();
        let err = board.commit("Done").await.unwrap_err();
        assert!(matches!(err, BoardError::IllegalTransition { .. }));
        assert_eq!(board.transition_state(), &TransitionState::Idle);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_list() {
        let mut store = MockTicketStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_fetch_tickets()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(sample()));
        store
            .expect_fetch_tickets()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(CollaboratorError::Unavailable("offline".into())));
        let mut board = board(store, empty_etas());

        assert_eq!(board.refresh().await, Ok(2));
        assert!(matches!(board.refresh().await, Err(BoardError::FetchFailed(_))));
        assert_eq!(board.tickets().len(), 2);
    }

    #[tokio::test]
    async fn eta_failure_does_not_fail_refresh() {
        let mut etas = MockEtaService::new();
        etas.expect_compute_etas()
            .returning(|_| Err(CollaboratorError::Timeout { duration_secs: 10 }));
        let mut board = board(fetching_store(), etas);

        assert_eq!(board.refresh().await, Ok(2));
        assert!(board.eta_results().is_empty());
        let view = board.view();
        assert!(view
            .columns
            .iter()
            .flat_map(|c| &c.cards)
            .all(|card| !card.eta.is_known()));
    }

    #[tokio::test]
    async fn worker_count_change_reloads_etas() {
        let mut etas = MockEtaService::new();
        etas.expect_compute_etas()
            .withf(|n: &u32| *n == 2)
            .times(1)
            .returning(|_| Ok(Vec::new()));
        etas.expect_compute_etas()
            .withf(|n: &u32| *n == 5)
            .times(1)
            .returning(|_| Ok(vec![EtaResult::new("T1", None)]));
        let mut board = board(fetching_store(), etas);
        board.refresh().await.unwrap();

        let completion = board.set_worker_count(WorkerCount::new(5)).await;
        assert_eq!(completion, Completion::Applied { count: 1 });
        assert_eq!(board.state().worker_count.get(), 5);
    }

    #[tokio::test]
    async fn superseded_eta_request_is_discarded() {
        let mut board = board(fetching_store(), empty_etas());
        board.refresh().await.unwrap();

        let slow = board.begin_eta_request();
        let fast = board.begin_eta_request();
        let newest = vec![EtaResult::new("T2", None)];
        assert_eq!(
            board.apply_eta_results(fast.generation, Ok(newest.clone())),
            Completion::Applied { count: 1 }
        );
        assert_eq!(
            board.apply_eta_results(slow.generation, Ok(vec![EtaResult::new("T1", None)])),
            Completion::Stale
        );
        assert_eq!(board.eta_results(), newest.as_slice());
    }

    /// Store whose stage updates never complete
    struct StalledStore;

    #[async_trait::async_trait]
    impl TicketStore for StalledStore {
        async fn fetch_tickets(&self) -> Result<Vec<Ticket>, CollaboratorError> {
            Ok(sample())
        }

        async fn update_ticket_stage(&self, _: &str, _: &Stage) -> Result<(), CollaboratorError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn dropped_commit_does_not_wedge_the_driver() {
        let workflow = Arc::new(Workflow::bundled().unwrap());
        let mut board = Board::new(workflow, StalledStore, empty_etas())
            .with_state(AppState::default().with_persona(Persona::Developer));
        board.refresh().await.unwrap();

        board.select_ticket("T1").unwrap();
        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            board.commit("Dev Blocked"),
        )
        .await;
        assert!(timed_out.is_err());

        assert_eq!(board.transition_state().phase(), DriverPhase::Idle);
        assert_eq!(board.tickets()[0].stage, "In Development");
        assert!(board.select_ticket("T2").is_ok());
    }

    #[tokio::test]
    async fn create_defaults_and_refresh_after_create() {
        let mut store = MockTicketStore::new();
        store.expect_fetch_tickets().times(2).returning(|| Ok(sample()));
        let mut board = board(store, empty_etas());
        board.refresh().await.unwrap();

        let draft = board.create_defaults();
        assert_eq!(draft.stage, "Backlog");
        assert_eq!(draft.sort_order, 3.0);
        assert_eq!(board.on_ticket_created().await, Ok(2));
    }
}

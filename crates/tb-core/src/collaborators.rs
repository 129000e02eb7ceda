//! External collaborators
//!
//! The board talks to two services. Both are asynchronous; timeouts and
//! retries belong to the implementations, the board only sees the outcome.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use std::sync::Arc;
use tb_eta::{EtaResult, Ticket};
use tb_workflow::Stage;

/// Source of truth for tickets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Current ticket list; no side effects on the store
    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, CollaboratorError>;

    /// Move one ticket; either the stage changed or it did not
    async fn update_ticket_stage(
        &self,
        ticket_id: &str,
        stage: &Stage,
    ) -> Result<(), CollaboratorError>;
}

/// Completion-date estimator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EtaService: Send + Sync {
    /// ETAs for the current backlog given `worker_count` (>= 1) workers
    async fn compute_etas(&self, worker_count: u32) -> Result<Vec<EtaResult>, CollaboratorError>;
}

#[async_trait]
impl<T: TicketStore + ?Sized> TicketStore for Arc<T> {
    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, CollaboratorError> {
        (**self).fetch_tickets().await
    }

    async fn update_ticket_stage(
        &self,
        ticket_id: &str,
        stage: &Stage,
    ) -> Result<(), CollaboratorError> {
        (**self).update_ticket_stage(ticket_id, stage).await
    }
}

#[async_trait]
impl<T: EtaService + ?Sized> EtaService for Arc<T> {
    async fn compute_etas(&self, worker_count: u32) -> Result<Vec<EtaResult>, CollaboratorError> {
        (**self).compute_etas(worker_count).await
    }
}

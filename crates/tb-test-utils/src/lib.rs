//! Testing utilities for the ticket board workspace
//!
//! Shared fixtures and in-memory collaborators.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tb_core::{CollaboratorError, EtaService, TicketStore};
use tb_eta::{EtaResult, Ticket};
use tb_workflow::{Stage, Workflow, WorkflowConfig};

/// Small workflow exercising both override tables
pub const OVERRIDES_WORKFLOW: &str = r##"
stages: [Backlog, Active Scoping, In Development, Dev Blocked, In QA, Done, Cancelled]
initial_stage: Backlog
forward:
  Backlog: [Active Scoping, Cancelled]
  Active Scoping: [In Development, Cancelled]
  In Development: [Dev Blocked, In QA]
  Dev Blocked: [In Development]
  In QA: [Done]
  Done: []
  Cancelled: [Backlog]
backtrack:
  Active Scoping: [Backlog]
  In Development: [Active Scoping, Backlog]
  In QA: [In Development]
  Cancelled: []
owners:
  Backlog: Client
  Active Scoping: Client
  In Development: Developer
  Dev Blocked: Developer
  In QA: QA
  Done: Client
  Cancelled: Client
owner_colors:
  Client: "#2196F3"
  Developer: "#00C853"
  QA: "#FF6D00"
  Default: "#BDBDBD"
stage_colors:
  Dev Blocked: "#FF5252"
columns:
  Developer:
    Todo: [Backlog, Active Scoping]
    Doing: [In Development, Dev Blocked]
    Review: [In QA]
  QA:
    Incoming: [In Development, Dev Blocked]
    Testing: [In QA]
advance_overrides:
  Developer:
    In Development:
      In QA: { label: "Send to QA", autofocus: true }
backtrack_overrides:
  QA:
    In QA:
      In Development: { label: "Bounce back" }
      Backlog: { label: "Rescope", icon: "♻️" }
"##;

pub fn bundled_workflow() -> Arc<Workflow> {
    Arc::new(Workflow::bundled().unwrap())
}

pub fn overrides_workflow() -> Arc<Workflow> {
    Arc::new(
        WorkflowConfig::from_yaml_str(OVERRIDES_WORKFLOW)
            .unwrap()
            .validate()
            .unwrap(),
    )
}

/// Tickets spread across the bundled workflow's lanes
pub fn sample_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new("a0B5g00000T1aaaEAA", "In Development")
            .with_name("Login page")
            .with_sort_order(1.0),
        Ticket::new("a0B5g00000T2bbbEAA", "Ready for QA")
            .with_name("Export CSV")
            .with_sort_order(2.0),
        Ticket::new("a0B5g00000T3cccEAA", "Backlog")
            .with_name("Dark mode")
            .with_priority("Low"),
        Ticket::new("a0B5g00000T4dddEAA", "Done").with_name("Password reset"),
    ]
}

/// ETA result at midnight UTC
pub fn eta(ticket_id: &str, year: i32, month: u32, day: u32) -> EtaResult {
    EtaResult::new(
        ticket_id,
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single(),
    )
}

/// Ticket store backed by a vector
#[derive(Debug, Default)]
pub struct InMemoryTicketStore {
    tickets: Mutex<Vec<Ticket>>,
    fail_fetch: Mutex<bool>,
    fail_updates: Mutex<bool>,
    updates: Mutex<Vec<(String, Stage)>>,
}

impl InMemoryTicketStore {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets),
            ..Self::default()
        }
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        *self.fail_fetch.lock() = fail;
    }

    pub fn set_fail_updates(&self, fail: bool) {
        *self.fail_updates.lock() = fail;
    }

    /// Add a ticket as if created through the form
    pub fn insert(&self, ticket: Ticket) {
        self.tickets.lock().push(ticket);
    }

    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.lock().clone()
    }

    /// Stage updates accepted so far
    pub fn updates(&self) -> Vec<(String, Stage)> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, CollaboratorError> {
        if *self.fail_fetch.lock() {
            return Err(CollaboratorError::Unavailable("store offline".into()));
        }
        Ok(self.snapshot())
    }

    async fn update_ticket_stage(
        &self,
        ticket_id: &str,
        stage: &Stage,
    ) -> Result<(), CollaboratorError> {
        if *self.fail_updates.lock() {
            return Err(CollaboratorError::Rejected("update refused".into()));
        }
        let mut tickets = self.tickets.lock();
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == ticket_id)
            .ok_or_else(|| CollaboratorError::Rejected(format!("no ticket {ticket_id}")))?;
        ticket.stage = stage.clone();
        self.updates.lock().push((ticket_id.to_string(), stage.clone()));
        Ok(())
    }
}

/// ETA service returning a fixed result set
#[derive(Debug, Default)]
pub struct StaticEtaService {
    results: Mutex<Vec<EtaResult>>,
    fail: Mutex<bool>,
    calls: Mutex<Vec<u32>>,
}

impl StaticEtaService {
    pub fn new(results: Vec<EtaResult>) -> Self {
        Self {
            results: Mutex::new(results),
            ..Self::default()
        }
    }

    pub fn set_results(&self, results: Vec<EtaResult>) {
        *self.results.lock() = results;
    }

    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock() = fail;
    }

    /// Worker counts requested so far
    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl EtaService for StaticEtaService {
    async fn compute_etas(&self, worker_count: u32) -> Result<Vec<EtaResult>, CollaboratorError> {
        self.calls.lock().push(worker_count);
        if *self.fail.lock() {
            return Err(CollaboratorError::Timeout { duration_secs: 30 });
        }
        Ok(self.results.lock().clone())
    }
}

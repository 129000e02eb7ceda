//! File-backed collaborators
//!
//! Tickets and ETA results are read from JSON arrays. Stage updates are
//! written back to the ticket file so a `move` is visible to the next run.
//! Only the stage value of the moved record changes; key names and unknown
//! fields are kept as they were in the file.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tb_core::{CollaboratorError, EtaService, TicketStore};
use tb_eta::{EtaResult, Ticket};
use tb_workflow::Stage;
use tokio::sync::Mutex;

/// Accepted key names, native first, then store-style
const ID_KEYS: [&str; 2] = ["id", "Id"];
const STAGE_KEYS: [&str; 2] = ["stage", "StageNamePk__c"];

fn record_id(record: &Map<String, Value>) -> Option<&str> {
    ID_KEYS.iter().find_map(|key| record.get(*key).and_then(Value::as_str))
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CollaboratorError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CollaboratorError::Unavailable(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CollaboratorError::Rejected(format!("{}: {e}", path.display())))
}

/// Ticket store over a JSON file
#[derive(Debug)]
pub(crate) struct JsonTicketStore {
    path: PathBuf,
    // serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl JsonTicketStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl TicketStore for JsonTicketStore {
    async fn fetch_tickets(&self) -> Result<Vec<Ticket>, CollaboratorError> {
        let _guard = self.lock.lock().await;
        read_json(&self.path).await
    }

    async fn update_ticket_stage(
        &self,
        ticket_id: &str,
        stage: &Stage,
    ) -> Result<(), CollaboratorError> {
        let _guard = self.lock.lock().await;
        let mut records: Vec<Map<String, Value>> = read_json(&self.path).await?;
        let record = records
            .iter_mut()
            .find(|r| record_id(r) == Some(ticket_id))
            .ok_or_else(|| CollaboratorError::Rejected(format!("ticket '{ticket_id}' not found")))?;
        let key = STAGE_KEYS
            .iter()
            .find(|key| record.contains_key(**key))
            .copied()
            .unwrap_or(STAGE_KEYS[0]);
        record.insert(key.to_string(), Value::String(stage.to_string()));

        let body = serde_json::to_string_pretty(&records)
            .map_err(|e| CollaboratorError::Rejected(e.to_string()))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| CollaboratorError::Unavailable(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(ticket = %ticket_id, %stage, path = %self.path.display(), "ticket file updated");
        Ok(())
    }
}

/// Precomputed ETA results, optionally from a JSON file
#[derive(Debug, Default)]
pub(crate) struct JsonEtaService {
    path: Option<PathBuf>,
}

impl JsonEtaService {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl EtaService for JsonEtaService {
    async fn compute_etas(&self, worker_count: u32) -> Result<Vec<EtaResult>, CollaboratorError> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };
        tracing::debug!(worker_count, path = %path.display(), "reading precomputed ETAs");
        read_json(path).await
    }
}

//! Ticket record as delivered by the ticket store
//!
//! Only `stage` is read or written by the board. The remaining business
//! attributes are carried through untouched, including any fields this crate
//! does not know about (kept in `extra`).

use crate::id::{normalize, NormalizedId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tb_workflow::Stage;

/// A work item on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Store identifier
    #[serde(alias = "Id")]
    pub id: String,
    /// Current lifecycle stage
    #[serde(alias = "StageNamePk__c")]
    pub stage: Stage,
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "PriorityPk__c", skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, alias = "SortOrderNumber__c", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<f64>,
    #[serde(default = "default_active", alias = "IsActiveBool__c")]
    pub active: bool,
    /// Attributes opaque to the board
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_active() -> bool {
    true
}

impl Ticket {
    /// Minimal active ticket
    #[must_use]
    pub fn new(id: impl Into<String>, stage: impl Into<Stage>) -> Self {
        Self {
            id: id.into(),
            stage: stage.into(),
            name: None,
            priority: None,
            sort_order: None,
            active: true,
            extra: Map::new(),
        }
    }

    /// Builder: set display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set sort order
    #[must_use]
    pub fn with_sort_order(mut self, sort_order: f64) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Builder: set priority
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Name if present, else the identifier
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Join key for ETA lookups
    #[inline]
    #[must_use]
    pub fn normalized_id(&self) -> NormalizedId {
        normalize(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_field_names() {
        let json = r#"{
            "Id": "a0B5g00000XyZabEAF",
            "StageNamePk__c": "In Development",
            "Name": "Fix login",
            "SortOrderNumber__c": 4,
            "Epic__c": "acme"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.stage, "In Development");
        assert_eq!(ticket.display_name(), "Fix login");
        assert_eq!(ticket.sort_order, Some(4.0));
        assert!(ticket.active);
        assert_eq!(ticket.extra["Epic__c"], "acme");
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(Ticket::new("T1", "Backlog").display_name(), "T1");
    }
}

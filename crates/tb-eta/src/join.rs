//! ETA join
//!
//! Matches ETA results to tickets by normalized identifier. A missing ETA is
//! a lookup miss: it is logged and rendered as [`UNKNOWN_ETA`], and it never
//! removes a ticket from the output.

use crate::format::{EtaFormat, UNKNOWN_ETA};
use crate::id::{normalize, NormalizedId};
use crate::ticket::Ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One result from the ETA service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtaResult {
    /// Ticket identifier, possibly in a longer form than the store's
    #[serde(alias = "ticketId")]
    pub ticket_id: String,
    /// Estimated completion, when the service could compute one
    #[serde(default, alias = "calculatedETA")]
    pub calculated_eta: Option<DateTime<Utc>>,
}

impl EtaResult {
    #[must_use]
    pub fn new(ticket_id: impl Into<String>, calculated_eta: Option<DateTime<Utc>>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            calculated_eta,
        }
    }
}

/// Display-ready ETA of one ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum EtaDisplay {
    /// Formatted date
    Known(String),
    /// No result, or a result without a timestamp
    Unknown,
}

impl EtaDisplay {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(date) => date,
            Self::Unknown => UNKNOWN_ETA,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for EtaDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EtaDisplay> for String {
    fn from(value: EtaDisplay) -> Self {
        value.as_str().to_string()
    }
}

/// A ticket with its joined ETA
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTicket {
    pub ticket: Ticket,
    pub eta: EtaDisplay,
}

/// Lookup from normalized ticket id to ETA timestamp
///
/// Results with an empty id are skipped. When two results normalize to the
/// same key the later one wins.
#[derive(Debug, Clone, Default)]
pub struct EtaIndex {
    by_id: HashMap<NormalizedId, Option<DateTime<Utc>>>,
}

impl EtaIndex {
    #[must_use]
    pub fn build(results: &[EtaResult]) -> Self {
        let mut by_id = HashMap::with_capacity(results.len());
        for result in results.iter().filter(|r| !r.ticket_id.is_empty()) {
            let key = normalize(&result.ticket_id);
            if by_id.insert(key, result.calculated_eta).is_some() {
                tracing::debug!(
                    ticket = %result.ticket_id,
                    "duplicate ETA result after normalization; keeping the later one"
                );
            }
        }
        Self { by_id }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// ETA for a ticket id (any length); `None` on a miss
    #[must_use]
    pub fn lookup(&self, ticket_id: &str) -> Option<Option<DateTime<Utc>>> {
        self.by_id.get(normalize(ticket_id).as_str()).copied()
    }

    /// Display value for one ticket, logging a miss
    #[must_use]
    pub fn display_for(&self, ticket: &Ticket, format: &EtaFormat) -> EtaDisplay {
        match self.lookup(&ticket.id) {
            Some(Some(at)) => EtaDisplay::Known(format.render(&at)),
            Some(None) => EtaDisplay::Unknown,
            None => {
                tracing::warn!(
                    ticket = %ticket.display_name(),
                    normalized = %ticket.normalized_id(),
                    "no ETA found for ticket"
                );
                EtaDisplay::Unknown
            }
        }
    }
}

/// Attach ETAs to tickets, preserving ticket order and count
#[must_use]
pub fn join(tickets: &[Ticket], results: &[EtaResult], format: &EtaFormat) -> Vec<EnrichedTicket> {
    let index = EtaIndex::build(results);
    tickets
        .iter()
        .map(|ticket| EnrichedTicket {
            eta: index.display_for(ticket, format),
            ticket: ticket.clone(),
        })
        .collect()
}

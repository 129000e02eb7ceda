//! ETA request sequencing
//!
//! Each call to the ETA service is tagged with a [`Generation`]. Requests may
//! overlap (e.g. the worker count changes while a computation is in flight)
//! and complete in any order. A completion is applied only when it is newer
//! than the last applied one, so the most recently issued request that has
//! completed always wins.

use crate::error::EtaError;
use crate::join::EtaResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic request tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Results replaced the current set
    Applied { count: usize },
    /// The request failed; the current set is now empty
    Cleared,
    /// A newer request already completed; the outcome was discarded
    Stale,
}

/// Holds the current ETA set and decides which completions may replace it
#[derive(Debug, Clone, Default)]
pub struct EtaTracker {
    issued: Generation,
    applied: Option<Generation>,
    results: Vec<EtaResult>,
}

impl EtaTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request
    pub fn begin(&mut self) -> Generation {
        self.issued = Generation(self.issued.0 + 1);
        tracing::debug!(generation = %self.issued, "ETA request issued");
        self.issued
    }

    /// Record the outcome of a request
    ///
    /// # Errors
    /// `EtaError::UnknownGeneration` for a generation [`begin`](Self::begin)
    /// never returned.
    pub fn complete<E: fmt::Display>(
        &mut self,
        generation: Generation,
        outcome: Result<Vec<EtaResult>, E>,
    ) -> Result<Completion, EtaError> {
        if generation.0 == 0 || generation > self.issued {
            return Err(EtaError::UnknownGeneration {
                generation,
                latest: self.issued,
            });
        }

        if self.applied.is_some_and(|applied| generation <= applied) {
            tracing::debug!(%generation, "discarding stale ETA result");
            return Ok(Completion::Stale);
        }

        self.applied = Some(generation);
        match outcome {
            Ok(results) => {
                let count = results.len();
                self.results = results;
                tracing::debug!(%generation, count, "ETA results applied");
                Ok(Completion::Applied { count })
            }
            Err(err) => {
                self.results.clear();
                tracing::warn!(%generation, error = %err, "ETA computation failed; showing no ETAs");
                Ok(Completion::Cleared)
            }
        }
    }

    /// Current ETA set
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[EtaResult] {
        &self.results
    }

    /// Latest generation handed out
    #[inline]
    #[must_use]
    pub fn latest_issued(&self) -> Generation {
        self.issued
    }

    /// Generation whose outcome is currently shown
    #[inline]
    #[must_use]
    pub fn last_applied(&self) -> Option<Generation> {
        self.applied
    }

    /// Whether a request is outstanding that is newer than what is shown
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.applied.map_or(self.issued.0 > 0, |applied| applied < self.issued)
    }
}

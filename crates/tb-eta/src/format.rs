//! ETA display formatting

use crate::error::EtaError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

/// Sentinel shown when a ticket has no ETA
pub const UNKNOWN_ETA: &str = "—";

/// Default pattern: numeric month/day/year without padding
pub const DEFAULT_ETA_FORMAT: &str = "%-m/%-d/%Y";

/// Date pattern applied to ETA timestamps (rendered in UTC)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtaFormat {
    pattern: String,
}

impl EtaFormat {
    /// Validate and wrap a strftime pattern
    ///
    /// # Errors
    /// `EtaError::InvalidFormat` if chrono cannot parse the pattern.
    pub fn new(pattern: impl Into<String>) -> Result<Self, EtaError> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            return Err(EtaError::InvalidFormat { pattern });
        }
        Ok(Self { pattern })
    }

    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Render a timestamp
    #[must_use]
    pub fn render(&self, at: &DateTime<Utc>) -> String {
        at.format(&self.pattern).to_string()
    }
}

impl Default for EtaFormat {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_ETA_FORMAT.to_string(),
        }
    }
}

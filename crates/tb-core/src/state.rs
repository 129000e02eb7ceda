//! Application state
//!
//! The viewer-controlled settings that shape the board. They are passed
//! explicitly into the view builder; nothing reads them implicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use tb_workflow::Persona;

/// How columns are laid out
///
/// Affects rendering only, never which tickets land in which column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Kanban,
    Compact,
    Table,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [Self::Kanban, Self::Compact, Self::Table];

    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kanban => "kanban",
            Self::Compact => "compact",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "kanban" | "columns" => Ok(Self::Kanban),
            "compact" => Ok(Self::Compact),
            "table" => Ok(Self::Table),
            other => Err(format!("Unknown display mode: {other}")),
        }
    }
}

/// Card sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeMode {
    /// Every card has the same height
    #[default]
    EqualSized,
    /// Cards grow with their content
    #[serde(alias = "ticketSize")]
    TicketSized,
}

/// Number of workers fed to the ETA service, always at least one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerCount(NonZeroU32);

impl WorkerCount {
    pub const ONE: WorkerCount = WorkerCount(NonZeroU32::MIN);

    /// Clamp to at least one
    #[must_use]
    pub fn new(count: u32) -> Self {
        NonZeroU32::new(count).map_or(Self::ONE, Self)
    }

    /// Parse free-form input by its leading digits
    ///
    /// Anything without leading digits, or below one, becomes one; trailing
    /// garbage is ignored ("3 devs" is 3).
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        let trimmed = input.trim_start();
        let digits = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .map_or(trimmed, |end| &trimmed[..end]);
        digits.parse::<u32>().map_or(Self::ONE, Self::new)
    }

    #[inline]
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self::new(2)
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Viewer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub persona: Persona,
    pub display_mode: DisplayMode,
    pub size_mode: SizeMode,
    /// Show every column instead of only the persona's own lanes
    pub show_all_columns: bool,
    pub worker_count: WorkerCount,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            persona: Persona::Client,
            display_mode: DisplayMode::Kanban,
            size_mode: SizeMode::EqualSized,
            show_all_columns: true,
            worker_count: WorkerCount::default(),
        }
    }
}

impl AppState {
    /// Builder: set persona
    #[must_use]
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    /// Builder: set display mode
    #[must_use]
    pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    /// Builder: show all columns or only self-owned lanes
    #[must_use]
    pub fn with_show_all_columns(mut self, show_all: bool) -> Self {
        self.show_all_columns = show_all;
        self
    }

    /// Builder: set ETA worker count
    #[must_use]
    pub fn with_worker_count(mut self, worker_count: WorkerCount) -> Self {
        self.worker_count = worker_count;
        self
    }
}

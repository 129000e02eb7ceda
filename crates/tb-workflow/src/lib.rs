//! Ticket board workflow model
//!
//! Everything the board knows about stages, without any tickets:
//! - Loading the workflow tables from YAML, JSON or TOML ([`WorkflowConfig`])
//! - Load-time validation into a sealed [`Workflow`]
//! - Stage graph lookups (forward and correction edges, owners)
//! - Persona column projection
//! - Transition option resolution with per-persona overrides
//!
//! # Example
//!
//! ```rust
//! use tb_workflow::{Persona, Workflow};
//!
//! let workflow = Workflow::bundled().unwrap();
//! let options = workflow.advance_options("Backlog", Persona::Client);
//! assert_eq!(options[0].target, "Active Scoping");
//! assert_eq!(options[0].icon, "🚀");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod graph;
pub mod palette;
pub mod projection;
pub mod resolver;
pub mod types;
pub mod validation;

pub use config::{
    ColumnTable, ConfigFormat, Glyphs, OptionOverride, OverrideTable, WorkflowConfig,
    DEFAULT_NEUTRAL_CARD_COLOR, DEFAULT_OWNER_COLOR,
};
pub use error::{IntegrityIssue, WorkflowError};
pub use graph::{TransitionDirection, Workflow};
pub use palette::{solid_style, Palette};
pub use resolver::TransitionOption;
pub use types::{Persona, Stage};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the workflow model
    pub use crate::{Persona, Stage, TransitionDirection, TransitionOption, Workflow, WorkflowConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Ticket Board Core
//!
//! Orchestration on top of the workflow model and the ETA engine:
//! - Collaborator traits for the ticket store and the ETA service
//! - Viewer settings ([`AppState`])
//! - The board view builder (pure, state + configuration -> view model)
//! - The transition driver (select, choose, commit, always back to idle)
//! - [`Board`], which sequences fetches, ETA loads and commits
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tb_core::{Board, AppState};
//! use tb_workflow::{Persona, Workflow};
//!
//! # async fn example(store: impl tb_core::TicketStore, etas: impl tb_core::EtaService) -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = Arc::new(Workflow::bundled()?);
//! let mut board = Board::new(workflow, store, etas)
//!     .with_state(AppState::default().with_persona(Persona::QA));
//!
//! board.refresh().await?;
//! board.select_ticket("a0B5g00000XyZab")?;
//! board.commit("In QA").await?;
//! println!("{} columns", board.view().columns.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod board;
pub mod collaborators;
pub mod draft;
pub mod driver;
pub mod error;
pub mod state;
pub mod view;

pub use board::{Board, EtaRequest};
pub use collaborators::{EtaService, TicketStore};
pub use draft::{TicketDraft, DEFAULT_PRIORITY};
pub use driver::{
    allowed_transitions, validate_transition, CandidateOptions, DriverPhase, PendingCommit,
    TransitionDriver, TransitionState,
};
pub use error::{BoardError, CollaboratorError};
pub use state::{AppState, DisplayMode, SizeMode, WorkerCount};
pub use view::{build_columns, BoardView, ColumnView, TicketCard};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the board
    pub use crate::{
        AppState, Board, BoardError, BoardView, CollaboratorError, DisplayMode, EtaService,
        TicketStore, WorkerCount,
    };
    pub use tb_eta::{EtaResult, Ticket};
    pub use tb_workflow::{Persona, Stage, Workflow};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

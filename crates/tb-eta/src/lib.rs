//! Ticket ETA engine
//!
//! - [`Ticket`]: the store's record, opaque except for its stage
//! - [`normalize`]: fixed-length identifier prefix used as the join key
//! - [`join`]: attach display-ready ETAs to tickets without dropping any
//! - [`EtaTracker`]: last-completed-wins sequencing of overlapping requests

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod format;
pub mod id;
pub mod join;
pub mod ticket;
pub mod tracker;

pub use error::EtaError;
pub use format::{EtaFormat, DEFAULT_ETA_FORMAT, UNKNOWN_ETA};
pub use id::{normalize, NormalizedId, NORMALIZED_ID_LEN};
pub use join::{join, EnrichedTicket, EtaDisplay, EtaIndex, EtaResult};
pub use ticket::Ticket;
pub use tracker::{Completion, EtaTracker, Generation};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

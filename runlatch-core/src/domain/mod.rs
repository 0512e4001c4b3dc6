//! Core domain types
//!
//! This module contains the entities the gate reasons about. They are
//! deserialized directly from the Actions REST API and shared between the
//! client (which fetches them) and the gate (which decides on them).

pub mod job;
pub mod run;
pub mod status;

pub use job::{Job, Step};
pub use run::Run;
pub use status::{Conclusion, RunStatus};

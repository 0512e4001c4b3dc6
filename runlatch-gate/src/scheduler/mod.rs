//! Scheduler layer for the gate
//!
//! Decides, poll by poll, whether this invocation may proceed, and drives the
//! wait between polls.

pub mod filter;
pub mod waiter;

pub use waiter::{WaitError, Waiter};

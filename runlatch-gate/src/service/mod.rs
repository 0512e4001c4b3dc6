//! Service layer
//!
//! Side effects the waiter needs besides the run source. Kept behind traits
//! so the waiter can be driven with recording fakes in tests.

mod outputs;

pub use outputs::{ActionOutputs, FORCE_CONTINUED, OutputSink, WAITED_SECONDS};

#[cfg(test)]
pub(crate) use outputs::testing;

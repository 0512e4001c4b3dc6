//! Data Transfer Objects for the Actions REST API
//!
//! The list endpoints wrap their items in a page envelope carrying the total
//! count. These DTOs mirror those envelopes so the client can paginate
//! without re-declaring them per endpoint.

pub mod job;
pub mod run;
pub mod workflow;

/// A single page of a paginated listing
pub trait Page {
    type Item;

    /// Total number of items across all pages, as reported by the API
    fn total_count(&self) -> u64;

    fn into_items(self) -> Vec<Self::Item>;
}

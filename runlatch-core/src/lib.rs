//! Runlatch Core
//!
//! Core types shared by the runlatch client and gate.
//!
//! This crate contains:
//! - Domain types: workflow runs, jobs and steps as the Actions API reports them
//! - DTOs: the paginated list envelopes the API wraps them in

pub mod domain;
pub mod dto;

//! Client code for stellate-purge.
//!
//! This crate provides the Stellate admin API client that turns purge
//! declarations into GraphQL mutations and sends them.

pub mod purge;

pub use purge::{PurgeClient, PurgeError, PurgeOutcome, Purger};

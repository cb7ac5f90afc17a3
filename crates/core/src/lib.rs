//! Core types and shared functionality for stellate-purge.
//!
//! This crate provides:
//! - Layered purge configuration
//! - The per-handler purge declaration registry
//! - Id resolution from response payloads

pub mod config;
pub mod payload;
pub mod registry;

pub use config::{ConfigError, Credentials, PurgeConfig};
pub use payload::resolve_id;
pub use registry::{HandlerId, PurgeRegistry, PurgeTypeDeclaration};

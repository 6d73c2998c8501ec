//! toolsync - reconcile local tool definitions with a remote catalog
//!
//! Walks a local tree of script + metadata pairs, mirrors it onto remote
//! categories and tools, and optionally prunes stale remote tools and
//! triggers builds for whatever changed.

pub mod api;
pub mod client;
pub mod error;
pub mod pull;
pub mod sync;
pub mod validate;

pub use error::{Result, SyncError};

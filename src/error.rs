//! Error types for toolsync
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur during a sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// Filesystem walk cannot proceed; aborts the run
    #[error("Traversal error: {0}")]
    Traversal(String),

    /// Pre-flight content check failed for one file
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Network-level failure after retries were exhausted
    #[error("Transport error: {0}")]
    Transport(String),

    /// Remote returned a non-success status
    #[error("Remote error (status {status}): {body}")]
    RemoteStatus { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolsync operations
pub type Result<T> = std::result::Result<T, SyncError>;

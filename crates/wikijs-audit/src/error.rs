//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while writing audit records.
///
/// These never reach a tool caller; [`crate::AuditLogger::record`] swallows them.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Failed to open the audit destination.
    #[error("failed to open audit log {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A sink lock was poisoned by a panicking writer.
    #[error("audit sink lock poisoned")]
    Poisoned,
}

//! Error types for the MCP crate.

use thiserror::Error;

/// Errors that can occur in the MCP server.
///
/// Tool failures are not represented here; they are rendered into error
/// envelopes and returned as ordinary results.
#[derive(Debug, Error)]
pub enum McpError {
    /// Two tools were registered under the same name.
    #[error("duplicate tool name: {name}")]
    DuplicateTool { name: String },

    /// A tool's input schema does not compile.
    #[error("invalid input schema for tool {tool}: {reason}")]
    InvalidSchema { tool: String, reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

//! # wikijs-mcp
//!
//! MCP (Model Context Protocol) server exposing the Wiki.js GraphQL API as
//! typed tools for AI agents.
//!
//! - **Read tools**: pages and their history, tags, comments, users, assets, site settings
//! - **Write tools**: gated by [`wikijs_policy::MutationGate`], dry-run by default
//! - **Audit**: every write attempt is recorded through [`wikijs_audit::AuditLogger`]
//! - **Transport**: newline-delimited JSON-RPC 2.0 over stdio
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (list tools / call tool)
//!       ▼
//! ┌──────────────────────┐
//! │  wikijs-mcp server   │
//! │  1. Validate input   │  ← jsonschema
//! │  2. Gate mutation    │  ← wikijs-policy
//! │  3. Scope the path   │
//! │  4. Dry-run or send  │  ← wikijs-graphql
//! │  5. Audit            │  ← wikijs-audit
//! │  6. Classify errors  │  ← wikijs-core
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     Wiki.js GraphQL API
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use wikijs_mcp::{McpServer, ToolContext, default_registry};
//!
//! let ctx = ToolContext::new(transport, gate, audit, config.defaults.clone());
//! let server = McpServer::new(default_registry()?, ctx);
//! server.run_stdio().await?;
//! ```

pub mod context;
pub mod error;
pub mod input;
pub mod mutation;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use context::ToolContext;
pub use error::McpError;
pub use mutation::{DRY_RUN_MESSAGE, DryRunPreview};
pub use protocol::{
    CallToolParams, CallToolResult, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
    ToolAnnotations, ToolContent, ToolDefinition,
};
pub use resources::{MARKDOWN_GUIDE_URI, PERMISSIONS_GUIDE_URI};
pub use server::{McpServer, SERVER_NAME};
pub use tools::{Tool, ToolRegistry, default_registry};

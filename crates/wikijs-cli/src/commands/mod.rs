//! CLI command implementations for the Wiki.js MCP server.

pub mod check;
pub mod serve;
pub mod tools;

//! # wikijs-core
//!
//! Shared building blocks for the Wiki.js MCP server.
//!
//! - [`config`]: environment-sourced configuration, validated once at startup
//! - [`error`]: the classified error taxonomy ([`WikiError`], [`ErrorKind`])
//! - [`classify`]: mapping of HTTP statuses and GraphQL error payloads onto the taxonomy
//! - [`display`]: rendering of any failure into LLM-readable guidance
//! - [`result`]: the uniform tool result envelope ([`CallToolResult`])
//!
//! ## Error kinds
//!
//! | Kind | Trigger | Default status |
//! |------|---------|----------------|
//! | `Auth` | HTTP 401, remote codes 1000-1999 | 401 |
//! | `Forbidden` | HTTP 403, permission-denied codes | 403 |
//! | `NotFound` | HTTP 404, page/comment not found | 404 |
//! | `Validation` | malformed or conflicting input codes | 422 |
//! | `RateLimited` | HTTP 429 | 429 |
//! | `Transient` | HTTP 5xx, timeout, connection failure | passthrough |
//! | `MutationDisabled` | write attempted while disabled | - |
//! | `InvalidToken` | confirm token mismatch | - |
//! | `PathNotAllowed` | path outside the allow-list | - |
//! | `Generic` | anything else | passthrough |

pub mod classify;
pub mod codes;
pub mod config;
pub mod display;
pub mod error;
pub mod path;
pub mod result;

pub use classify::{
    ExceptionInfo, GraphqlErrorExtensions, GraphqlErrorPayload, ResponseResult, classify_graphql_error,
    classify_http_status, classify_remote_code, classify_response_result,
};
pub use config::{ConfigError, Endpoint, HttpConfig, MutationConfig, PageDefaults, Secrets, WikiConfig};
pub use display::{
    InputError, InputIssue, ToolError, UNEXPECTED_MESSAGE_BUDGET, format_for_display, truncate_unexpected,
};
pub use error::{ErrorKind, RETRYABLE_STATUSES, RemoteCode, WikiError};
pub use path::normalize_wiki_path;
pub use result::{CallToolResult, ToolContent, error_result, json_result, text_result};

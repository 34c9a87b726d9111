//! Rendering of failures into LLM-readable guidance.
//!
//! [`format_for_display`] turns any [`ToolError`] into an error envelope made of a
//! one-line headline naming the failure and the operation, followed by
//! kind-specific remediation text. It is total: every input produces a result.

use crate::codes;
use crate::error::{ErrorKind, WikiError};
use crate::result::{CallToolResult, error_result};
use std::fmt;
use thiserror::Error;

/// Maximum length of an unexpected or upstream error message shown to the caller.
pub const UNEXPECTED_MESSAGE_BUDGET: usize = 200;

/// One schema violation in tool arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputIssue {
    /// JSON pointer of the offending field (empty for the root object).
    pub path: String,
    pub message: String,
}

/// Tool arguments failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct InputError {
    pub issues: Vec<InputIssue>,
}

impl InputError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![InputIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", display_path(&issue.path), issue.message))
            .collect();
        write!(f, "invalid input: {}", parts.join("; "))
    }
}

/// Everything a tool handler can fail with.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Wiki(#[from] WikiError),

    #[error(transparent)]
    Input(#[from] InputError),

    /// A failure outside the taxonomy; shown truncated.
    #[error("{0}")]
    Unexpected(String),
}

/// Render a failure for the caller.
pub fn format_for_display(error: &ToolError, context: &str) -> CallToolResult {
    match error {
        ToolError::Wiki(err) => error_result(describe_wiki_error(err, context)),
        ToolError::Input(err) => error_result(describe_input_error(err, context)),
        ToolError::Unexpected(message) => error_result(format!(
            "Failed to {}: {}",
            context,
            truncate_unexpected(message)
        )),
    }
}

/// First line of `message`, cut to [`UNEXPECTED_MESSAGE_BUDGET`] characters.
pub fn truncate_unexpected(message: &str) -> String {
    let first_line = message.lines().next().unwrap_or("").trim();
    if first_line.chars().count() <= UNEXPECTED_MESSAGE_BUDGET {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(UNEXPECTED_MESSAGE_BUDGET).collect();
    format!("{}...", cut)
}

fn display_path(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() { "(root)" } else { trimmed }
}

fn describe_input_error(err: &InputError, context: &str) -> String {
    let mut text = format!("Invalid Input while {}\n", context);
    for issue in &err.issues {
        text.push_str(&format!("\n  - {}: {}", display_path(&issue.path), issue.message));
    }
    text
}

fn describe_wiki_error(err: &WikiError, context: &str) -> String {
    let code = err.numeric_code();

    match err.kind {
        ErrorKind::Auth => format!(
            "Authentication Failed while {}\n\n{}\n\nHow to fix:\n\
             1. Verify WIKI_API_TOKEN holds a valid, non-expired API key (Administration > API Access).\n\
             2. Make sure the API is enabled on the Wiki.js instance.",
            context, err.message
        ),
        ErrorKind::Forbidden => {
            let headline = match &err.code {
                Some(code) => format!("Permission Denied (Wiki.js Error {}) while {}", code, context),
                None => format!("Permission Denied while {}", context),
            };
            let guidance = match code.and_then(codes::permission_for) {
                Some(permission) => format!(
                    "How to fix:\n\
                     1. Open Administration > Groups and select the group assigned to the API key.\n\
                     2. Under Permissions, enable {}.\n\
                     3. Under Page Rules, make sure the target path is not excluded for that group.",
                    permission
                ),
                None => "How to fix: check the permissions and page rules of the API key's group \
                         in Administration > Groups."
                    .to_string(),
            };
            format!("{}\n\n{}\n\n{}", headline, err.message, guidance)
        }
        ErrorKind::NotFound => format!(
            "Not Found while {}\n\n{}\n\nVerify the page path, id, or locale. \
             Use wikijs_search_pages or wikijs_list_pages to find existing pages.",
            context, err.message
        ),
        ErrorKind::Validation => {
            let headline = match &err.code {
                Some(code) => format!("Validation Failed (Wiki.js Error {}) while {}", code, context),
                None => format!("Validation Failed while {}", context),
            };
            format!(
                "{}\n\n{}\n\nCheck the path, content, and locale values. Paths must not contain \
                 illegal characters, content must not be empty, and the target path must be free.",
                headline, err.message
            )
        }
        ErrorKind::RateLimited => format!(
            "Rate Limited while {}\n\n{}\n\nWait before retrying. Rate-limited requests are not retried automatically.",
            context, err.message
        ),
        ErrorKind::Transient if err.status == Some(408) => format!(
            "Request Timed Out while {}\n\n{}\n\nIf this was a write operation it may still have been applied. \
             Verify the current state before retrying.",
            context, err.message
        ),
        ErrorKind::Transient => format!(
            "Wiki.js Server Error while {}\n\n{}\n\nThe Wiki.js server may be temporarily unavailable. Try again shortly.",
            context, err.message
        ),
        ErrorKind::MutationDisabled => format!(
            "Mutation Disabled: {}\n\nTo enable write operations:\n\
             1. Set WIKI_MUTATIONS_ENABLED=true\n\
             2. Set WIKI_MUTATION_DRY_RUN=false to perform real writes instead of previews\n\
             3. If WIKI_MUTATION_CONFIRM_TOKEN is set, pass its value as the `confirm` argument",
            err.message
        ),
        ErrorKind::InvalidToken => format!(
            "{}\n\nPass the value of WIKI_MUTATION_CONFIRM_TOKEN as the `confirm` argument.",
            err.message
        ),
        ErrorKind::PathNotAllowed => format!(
            "{}\n\nChoose a path inside one of the allowed prefixes or adjust WIKI_ALLOWED_MUTATION_PATH_PREFIXES.",
            err.message
        ),
        ErrorKind::Generic => format!(
            "Failed to {}: {}",
            context,
            truncate_unexpected(&err.message)
        ),
    }
}

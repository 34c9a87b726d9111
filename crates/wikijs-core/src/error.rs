//! Classified error type shared by every layer.
//!
//! Every failure that crosses a component boundary is a [`WikiError`]
//! tagged with exactly one [`ErrorKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// HTTP statuses that are retried even when the error kind is not `Transient`.
pub const RETRYABLE_STATUSES: [u16; 4] = [408, 502, 503, 504];

/// The kind of a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The API token was rejected.
    Auth,
    /// The API key lacks a permission.
    Forbidden,
    /// The addressed page or comment does not exist.
    NotFound,
    /// The remote platform rejected the input.
    Validation,
    /// Server-side or network failure that may succeed on retry.
    Transient,
    /// The remote platform is throttling requests.
    RateLimited,
    /// A write was attempted while mutations are disabled.
    MutationDisabled,
    /// The supplied confirm token did not match.
    InvalidToken,
    /// The target path is outside the allowed prefixes.
    PathNotAllowed,
    /// Anything else.
    Generic,
}

impl ErrorKind {
    /// The HTTP status implied by this kind when none was observed.
    pub fn default_status(self) -> Option<u16> {
        match self {
            ErrorKind::Auth => Some(401),
            ErrorKind::Forbidden => Some(403),
            ErrorKind::NotFound => Some(404),
            ErrorKind::Validation => Some(422),
            ErrorKind::RateLimited => Some(429),
            ErrorKind::Transient
            | ErrorKind::MutationDisabled
            | ErrorKind::InvalidToken
            | ErrorKind::PathNotAllowed
            | ErrorKind::Generic => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Transient => "transient",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::MutationDisabled => "mutation_disabled",
            ErrorKind::InvalidToken => "invalid_token",
            ErrorKind::PathNotAllowed => "path_not_allowed",
            ErrorKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A remote error code as sent by Wiki.js: usually numeric, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteCode {
    Numeric(i64),
    Text(String),
}

impl RemoteCode {
    /// Numeric value of the code, parsing numeric strings.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            RemoteCode::Numeric(n) => Some(*n),
            RemoteCode::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for RemoteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteCode::Numeric(n) => write!(f, "{}", n),
            RemoteCode::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RemoteCode {
    fn from(code: i64) -> Self {
        RemoteCode::Numeric(code)
    }
}

/// A failure tagged with one of the taxonomy kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WikiError {
    pub kind: ErrorKind,
    pub message: String,
    /// Remote code, when the failure came from a GraphQL payload.
    pub code: Option<RemoteCode>,
    /// Observed or implied HTTP status.
    pub status: Option<u16>,
}

impl WikiError {
    /// Create an error with the kind's default status.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            status: kind.default_status(),
        }
    }

    pub fn with_code(mut self, code: impl Into<RemoteCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    // =========================================================================
    // REMOTE FAILURES
    // =========================================================================

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// A retryable failure, carrying the observed status if any.
    pub fn transient(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            kind: ErrorKind::Transient,
            message: message.into(),
            code: None,
            status,
        }
    }

    /// The request exceeded its time bound.
    pub fn timed_out(timeout_ms: u64, request_id: &str) -> Self {
        Self::transient(
            format!("Request timed out after {}ms ({})", timeout_ms, request_id),
            Some(408),
        )
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generic, message)
    }

    // =========================================================================
    // LOCAL POLICY FAILURES
    // =========================================================================

    pub fn mutation_disabled() -> Self {
        Self::new(
            ErrorKind::MutationDisabled,
            "Mutation tools are disabled. Set WIKI_MUTATIONS_ENABLED=true to allow write operations.",
        )
    }

    pub fn invalid_token() -> Self {
        Self::new(
            ErrorKind::InvalidToken,
            "Invalid confirm token for mutation tool.",
        )
    }

    /// The path is outside the allow-list; the message names the path and every prefix.
    pub fn path_not_allowed(path: &str, allowed_prefixes: &[String]) -> Self {
        Self::new(
            ErrorKind::PathNotAllowed,
            format!(
                "Path '{}' is not within the allowed mutation paths. Allowed prefixes: {}",
                path,
                allowed_prefixes.join(", ")
            ),
        )
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Whether the transport may retry the request that produced this error.
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Transient
            || self
                .status
                .is_some_and(|status| RETRYABLE_STATUSES.contains(&status))
    }

    /// The remote code as a number, if it has one.
    pub fn numeric_code(&self) -> Option<i64> {
        self.code.as_ref().and_then(RemoteCode::as_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_per_kind() {
        assert_eq!(WikiError::auth("x").status, Some(401));
        assert_eq!(WikiError::forbidden("x").status, Some(403));
        assert_eq!(WikiError::not_found("x").status, Some(404));
        assert_eq!(WikiError::validation("x").status, Some(422));
        assert_eq!(WikiError::rate_limited("x").status, Some(429));
        assert_eq!(WikiError::generic("x").status, None);
        assert_eq!(WikiError::mutation_disabled().status, None);
    }

    #[test]
    fn test_retryable() {
        assert!(WikiError::transient("boom", Some(500)).is_retryable());
        assert!(WikiError::transient("network", None).is_retryable());
        assert!(WikiError::generic("timeout").with_status(408).is_retryable());
        assert!(!WikiError::rate_limited("slow down").is_retryable());
        assert!(!WikiError::forbidden("no").is_retryable());
        assert!(!WikiError::mutation_disabled().is_retryable());
    }

    #[test]
    fn test_timed_out_names_bound_and_request_id() {
        let err = WikiError::timed_out(1500, "req_abc");
        assert_eq!(err.kind, ErrorKind::Transient);
        assert_eq!(err.status, Some(408));
        assert!(err.message.contains("1500ms"));
        assert!(err.message.contains("req_abc"));
    }

    #[test]
    fn test_path_not_allowed_lists_prefixes() {
        let err = WikiError::path_not_allowed(
            "admin/secret",
            &["docs".to_string(), "guides".to_string()],
        );
        assert_eq!(err.kind, ErrorKind::PathNotAllowed);
        assert!(err.message.contains("admin/secret"));
        assert!(err.message.contains("docs, guides"));
    }

    #[test]
    fn test_remote_code_numeric_string() {
        assert_eq!(RemoteCode::Text("6013".into()).as_number(), Some(6013));
        assert_eq!(RemoteCode::Text("FORBIDDEN".into()).as_number(), None);
        assert_eq!(RemoteCode::Numeric(1001).to_string(), "1001");
    }

    #[test]
    fn test_remote_code_deserializes_either_shape() {
        let numeric: RemoteCode = serde_json::from_str("6003").unwrap();
        let text: RemoteCode = serde_json::from_str("\"UNAUTHENTICATED\"").unwrap();
        assert_eq!(numeric, RemoteCode::Numeric(6003));
        assert_eq!(text, RemoteCode::Text("UNAUTHENTICATED".into()));
    }
}

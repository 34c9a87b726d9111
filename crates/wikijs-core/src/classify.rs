//! Classification of remote failures into the error taxonomy.
//!
//! Three entry points, one per failure surface:
//!
//! - [`classify_http_status`]: a non-2xx HTTP response
//! - [`classify_graphql_error`]: an entry of a GraphQL `errors` array
//! - [`classify_response_result`]: a mutation payload with `succeeded: false`
//!
//! Raw response bodies never end up in a classified message.

use crate::codes;
use crate::display::{ToolError, format_for_display, truncate_unexpected};
use crate::error::{ErrorKind, RemoteCode, WikiError};
use crate::result::CallToolResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classify a non-success HTTP status. The body is never copied into the message.
pub fn classify_http_status(status: u16, body: &str) -> WikiError {
    tracing::debug!(status, body_len = body.len(), "Classifying HTTP failure");

    match status {
        401 => WikiError::auth("Authentication failed. Check WIKI_API_TOKEN."),
        403 => WikiError::forbidden("Access forbidden. Check API key permissions."),
        404 => WikiError::not_found(
            "Wiki.js GraphQL endpoint not found (404). Check WIKI_BASE_URL and WIKI_GRAPHQL_PATH.",
        ),
        429 => WikiError::rate_limited("Rate limited by Wiki.js. Try again later."),
        500..=599 => WikiError::transient(
            format!(
                "Wiki.js server error ({}). The server encountered an internal error.",
                status
            ),
            Some(status),
        ),
        _ => WikiError::generic(format!("Wiki.js request failed with status {}", status))
            .with_status(status),
    }
}

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub extensions: Option<GraphqlErrorExtensions>,
}

/// The `extensions` object Wiki.js attaches to GraphQL errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorExtensions {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub exception: Option<ExceptionInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    #[serde(default)]
    pub code: Option<Value>,
}

impl GraphqlErrorPayload {
    /// Build a payload carrying a numeric code, as Wiki.js does.
    pub fn with_code(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: Some(message.into()),
            extensions: Some(GraphqlErrorExtensions {
                code: Some(Value::from(code)),
                exception: None,
            }),
        }
    }

    /// The remote code, preferring `extensions.exception.code` over `extensions.code`.
    pub fn code(&self) -> Option<RemoteCode> {
        let extensions = self.extensions.as_ref()?;
        extensions
            .exception
            .as_ref()
            .and_then(|exception| exception.code.as_ref())
            .and_then(remote_code_from_value)
            .or_else(|| extensions.code.as_ref().and_then(remote_code_from_value))
    }
}

fn remote_code_from_value(value: &Value) -> Option<RemoteCode> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_i64().map(RemoteCode::Numeric),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(RemoteCode::Text(s.clone())),
        other => Some(RemoteCode::Text(other.to_string())),
    }
}

/// Classify a GraphQL error entry by its remote code.
pub fn classify_graphql_error(error: &GraphqlErrorPayload) -> WikiError {
    // Upstream messages can carry server stack traces.
    let message = error
        .message
        .as_deref()
        .map(truncate_unexpected)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Unknown GraphQL error".to_string());

    match error.code() {
        Some(code) => classify_remote_code(&code, &message),
        None => WikiError::generic(message),
    }
}

/// Map a remote code and its message onto the taxonomy.
///
/// Unknown codes become `Generic` with the code preserved.
pub fn classify_remote_code(code: &RemoteCode, message: &str) -> WikiError {
    let Some(number) = code.as_number() else {
        let kind = match code.to_string().to_ascii_uppercase().as_str() {
            "UNAUTHENTICATED" => ErrorKind::Auth,
            "FORBIDDEN" => ErrorKind::Forbidden,
            "BAD_USER_INPUT" => ErrorKind::Validation,
            _ => ErrorKind::Generic,
        };
        return WikiError::new(kind, format!("{} (Wiki.js code: {})", message, code))
            .with_code(code.clone());
    };

    let kind = codes::kind_for(number);
    let detail = match codes::lookup(number) {
        Some(info) if number == 6013 => format!(
            "{} (Wiki.js code {}: {}). Verify page rules and API-key group permissions for read:pages/read:source.",
            message, number, info.name
        ),
        Some(info) => match info.permission {
            Some(permission) => format!(
                "{} (Wiki.js code {}: {}). Requires the {} permission.",
                message, number, info.name, permission
            ),
            None => format!("{} (Wiki.js code {}: {})", message, number, info.name),
        },
        None if kind == ErrorKind::Auth => {
            format!("{} (Wiki.js code {}: authentication failure)", message, number)
        }
        None => format!("{} (Wiki.js code: {})", message, number),
    };

    WikiError::new(kind, detail).with_code(RemoteCode::Numeric(number))
}

/// The `responseResult` object Wiki.js mutations return instead of raising.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseResult {
    pub succeeded: bool,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseResult {
    /// The classified failure, or `None` when the mutation succeeded.
    pub fn to_error(&self) -> Option<WikiError> {
        if self.succeeded {
            return None;
        }

        let message = self
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "Wiki.js reported a failed operation ({})",
                    self.slug.as_deref().unwrap_or("no detail")
                )
            });

        Some(match self.error_code.filter(|code| *code != 0) {
            Some(code) => classify_remote_code(&RemoteCode::Numeric(code), &message),
            None => WikiError::generic(message),
        })
    }
}

/// Classify a failed `responseResult` and format it for display.
pub fn classify_response_result(result: &ResponseResult, context: &str) -> CallToolResult {
    let error = result
        .to_error()
        .unwrap_or_else(|| WikiError::generic("Wiki.js reported success with an error envelope"));
    format_for_display(&ToolError::Wiki(error), context)
}

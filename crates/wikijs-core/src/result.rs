//! The uniform envelope every tool returns.

use serde::{Deserialize, Serialize};

/// Tool result: `{content: [{type: "text", text}], isError?: true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Tool response content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl CallToolResult {
    /// Whether the result reports a failure.
    pub fn is_error(&self) -> bool {
        self.is_error == Some(true)
    }

    /// All text content joined by newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A successful text result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult {
        content: vec![ToolContent::Text { text: text.into() }],
        is_error: None,
    }
}

/// A failed result; the text is prefixed with `Error: `.
pub fn error_result(text: impl AsRef<str>) -> CallToolResult {
    CallToolResult {
        content: vec![ToolContent::Text {
            text: format!("Error: {}", text.as_ref()),
        }],
        is_error: Some(true),
    }
}

/// A successful result carrying pretty-printed JSON.
pub fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(text) => text_result(text),
        Err(e) => error_result(format!("Failed to serialize result: {}", e)),
    }
}

//! Static MCP resources.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const PERMISSIONS_GUIDE_URI: &str = "wikijs://guides/api-permissions";

pub const MARKDOWN_GUIDE_URI: &str = "wikijs://guides/markdown-syntax";

const PERMISSIONS_GUIDE: &str = include_str!("guides/api_permissions.md");
const MARKDOWN_GUIDE: &str = include_str!("guides/markdown_syntax.md");

/// A resource as listed by `resources/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

struct StaticResource {
    uri: &'static str,
    name: &'static str,
    description: &'static str,
    mime_type: &'static str,
    text: &'static str,
}

const RESOURCES: &[StaticResource] = &[
    StaticResource {
        uri: MARKDOWN_GUIDE_URI,
        name: "Wiki.js Markdown Syntax Guide",
        description: "Wiki.js extensions to Markdown: styled blockquotes, tabs, image sizes, diagrams, \
                      list and table classes. Read this before writing page content with the markdown editor.",
        mime_type: "text/markdown",
        text: MARKDOWN_GUIDE,
    },
    StaticResource {
        uri: PERMISSIONS_GUIDE_URI,
        name: "Wiki.js API Permissions Guide",
        description: "API key setup, the permission each tool needs, page rules and Wiki.js error codes. \
                      Read this when a tool reports Permission Denied.",
        mime_type: "text/markdown",
        text: PERMISSIONS_GUIDE,
    },
];

pub fn list() -> Vec<ResourceDefinition> {
    RESOURCES
        .iter()
        .map(|r| ResourceDefinition {
            uri: r.uri.to_string(),
            name: r.name.to_string(),
            description: r.description.to_string(),
            mime_type: r.mime_type.to_string(),
        })
        .collect()
}

/// `resources/read` result for `uri`, or `None` when no such resource exists.
pub fn read(uri: &str) -> Option<Value> {
    RESOURCES.iter().find(|r| r.uri == uri).map(|r| {
        json!({
            "contents": [{
                "uri": r.uri,
                "mimeType": r.mime_type,
                "text": r.text,
            }]
        })
    })
}

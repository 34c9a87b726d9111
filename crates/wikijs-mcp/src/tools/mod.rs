//! Tool registry and the Wiki.js tools.
//!
//! | Module | Tools |
//! |--------|-------|
//! | [`pages`] | search, list, get by path/id, tree, history, version, links |
//! | [`page_mutations`] | create, update, delete, move, restore |
//! | [`tags`] | list, search, update, delete |
//! | [`comments`] | list, get, create, update, delete |
//! | [`users`] | current user, search |
//! | [`site`] | system info, navigation, site config |
//! | [`assets`] | list assets, list folders |

pub mod assets;
pub mod comments;
pub mod page_mutations;
pub mod pages;
pub mod site;
pub mod tags;
pub mod users;

use crate::context::ToolContext;
use crate::error::McpError;
use crate::input;
use crate::protocol::ToolDefinition;
use async_trait::async_trait;
use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use wikijs_core::{CallToolResult, ToolError, error_result, format_for_display};

/// One MCP tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description, input schema and hints.
    fn definition(&self) -> ToolDefinition;

    /// Operation phrase used in error headlines ("search pages").
    fn context(&self) -> &'static str;

    /// Run with arguments that already passed schema validation.
    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError>;
}

struct RegisteredTool {
    tool: Arc<dyn Tool>,
    definition: ToolDefinition,
    validator: Validator,
}

/// Registry of available MCP tools, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Duplicate names and uncompilable schemas are rejected.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), McpError> {
        let definition = tool.definition();
        if self.index.contains_key(&definition.name) {
            return Err(McpError::DuplicateTool {
                name: definition.name,
            });
        }

        let validator =
            jsonschema::validator_for(&definition.input_schema).map_err(|e| {
                McpError::InvalidSchema {
                    tool: definition.name.clone(),
                    reason: e.to_string(),
                }
            })?;

        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool {
            tool,
            definition,
            validator,
        });
        Ok(())
    }

    /// Get a tool's definition by name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|i| &self.tools[*i].definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All definitions, in registration order.
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.definition.name.as_str()).collect()
    }

    /// Validate arguments and run the named tool.
    ///
    /// Always returns an envelope: unknown tools, schema violations and tool
    /// failures all become error results.
    pub async fn call(&self, ctx: &ToolContext, name: &str, arguments: Value) -> CallToolResult {
        let Some(registered) = self.index.get(name).map(|i| &self.tools[*i]) else {
            return error_result(format!("Unknown tool: {}", name));
        };
        let context = registered.tool.context();

        if let Err(err) = input::validate(&registered.validator, &arguments) {
            tracing::debug!(tool = name, issues = err.issues.len(), "Tool input rejected");
            return format_for_display(&ToolError::Input(err), context);
        }

        match registered.tool.run(ctx, arguments).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(tool = name, error = %err, "Tool call failed");
                format_for_display(&err, context)
            }
        }
    }
}

/// A registry holding every Wiki.js tool.
pub fn default_registry() -> Result<ToolRegistry, McpError> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        // Pages (read)
        Arc::new(pages::SearchPages),
        Arc::new(pages::ListPages),
        Arc::new(pages::GetPageByPath),
        Arc::new(pages::GetPageById),
        Arc::new(pages::GetPageTree),
        Arc::new(pages::GetPageHistory),
        Arc::new(pages::GetPageVersion),
        Arc::new(pages::GetPageLinks),
        // Tags (read)
        Arc::new(tags::ListTags),
        Arc::new(tags::SearchTags),
        // Pages (write)
        Arc::new(page_mutations::CreatePage),
        Arc::new(page_mutations::UpdatePage),
        Arc::new(page_mutations::DeletePage),
        Arc::new(page_mutations::MovePage),
        Arc::new(page_mutations::RestorePage),
        // Tags (write)
        Arc::new(tags::UpdateTag),
        Arc::new(tags::DeleteTag),
        // Comments
        Arc::new(comments::ListComments),
        Arc::new(comments::GetComment),
        Arc::new(comments::CreateComment),
        Arc::new(comments::UpdateComment),
        Arc::new(comments::DeleteComment),
        // Users
        Arc::new(users::GetCurrentUser),
        Arc::new(users::SearchUsers),
        // Site and assets
        Arc::new(site::GetSystemInfo),
        Arc::new(site::GetNavigation),
        Arc::new(site::GetSiteConfig),
        Arc::new(assets::ListAssets),
        Arc::new(assets::ListAssetFolders),
    ];

    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolAnnotations;
    use serde_json::json;

    struct Echo(&'static str);

    #[async_trait]
    impl Tool for Echo {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.0.to_string(),
                description: "Echo".to_string(),
                input_schema: json!({ "type": "object" }),
                annotations: Some(ToolAnnotations::read_only()),
            }
        }

        fn context(&self) -> &'static str {
            "echo"
        }

        async fn run(&self, _ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
            Ok(wikijs_core::json_result(&arguments))
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("test"))).unwrap();

        assert!(registry.get("test").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.contains("test"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("dup"))).unwrap();
        let err = registry.register(Arc::new(Echo("dup"))).unwrap_err();
        assert!(matches!(err, McpError::DuplicateTool { ref name } if name == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo("b"))).unwrap();
        registry.register(Arc::new(Echo("a"))).unwrap();
        assert_eq!(registry.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_default_registry_is_complete() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.len(), 29);
        for name in [
            "wikijs_search_pages",
            "wikijs_list_pages",
            "wikijs_get_page_by_path",
            "wikijs_get_page_by_id",
            "wikijs_get_page_tree",
            "wikijs_get_page_history",
            "wikijs_get_page_version",
            "wikijs_get_page_links",
            "wikijs_list_tags",
            "wikijs_search_tags",
            "wikijs_list_comments",
            "wikijs_get_comment",
            "wikijs_get_current_user",
            "wikijs_search_users",
            "wikijs_get_system_info",
            "wikijs_get_navigation",
            "wikijs_get_site_config",
            "wikijs_list_assets",
            "wikijs_list_asset_folders",
            "wikijs_create_page",
            "wikijs_update_page",
            "wikijs_delete_page",
            "wikijs_move_page",
            "wikijs_restore_page",
            "wikijs_update_tag",
            "wikijs_delete_tag",
            "wikijs_create_comment",
            "wikijs_update_comment",
            "wikijs_delete_comment",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_every_schema_is_closed() {
        let registry = default_registry().unwrap();
        for definition in registry.list() {
            assert_eq!(
                definition.input_schema["additionalProperties"],
                json!(false),
                "{} accepts unknown properties",
                definition.name
            );
            let read_only = definition
                .annotations
                .as_ref()
                .and_then(|a| a.read_only_hint)
                .unwrap_or(false);
            let mutation = definition.input_schema["properties"].get("confirm").is_some();
            assert_eq!(read_only, !mutation, "{} hints disagree with schema", definition.name);
        }
    }
}

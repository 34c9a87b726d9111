//! Tag tools.
//!
//! Tags are global entities, not page-scoped, so writes carry no path check.

use super::Tool;
use crate::context::ToolContext;
use crate::input::decode;
use crate::mutation::{audited, dry_run, finish};
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ResponseResult, ToolError, WikiError, json_result};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagItem {
    pub id: i64,
    pub tag: String,
    pub title: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Payload of tag mutations.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagMutationPayload {
    pub response_result: ResponseResult,
}

// ---------------------------------------------------------------------------
// wikijs_list_tags
// ---------------------------------------------------------------------------

const LIST_TAGS: &str = r#"
query ListTags {
  pages {
    tags {
      id
      tag
      title
      createdAt
      updatedAt
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct ListTagsData {
    pages: ListTagsPages,
}

#[derive(Debug, Deserialize)]
struct ListTagsPages {
    #[serde(default)]
    tags: Vec<TagItem>,
}

pub struct ListTags;

#[async_trait]
impl Tool for ListTags {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_list_tags".to_string(),
            description: "List all tags used across wiki pages. Useful for discovering content categories and taxonomy.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "list tags"
    }

    async fn run(&self, ctx: &ToolContext, _arguments: Value) -> Result<CallToolResult, ToolError> {
        let data: ListTagsData = ctx.graphql(LIST_TAGS, json!({})).await?;
        Ok(json_result(&data.pages.tags))
    }
}

// ---------------------------------------------------------------------------
// wikijs_search_tags
// ---------------------------------------------------------------------------

const SEARCH_TAGS: &str = r#"
query SearchTags($query: String!) {
  pages {
    searchTags(query: $query)
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchTagsInput {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchTagsData {
    pages: SearchTagsPages,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchTagsPages {
    #[serde(default)]
    search_tags: Vec<String>,
}

pub struct SearchTags;

#[async_trait]
impl Tool for SearchTags {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_search_tags".to_string(),
            description: "Search for tags matching a query string. Returns matching tag names."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "minLength": 1, "description": "Search query for tag names." }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "search tags"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: SearchTagsInput = decode(arguments)?;
        let data: SearchTagsData = ctx
            .graphql(SEARCH_TAGS, json!({ "query": input.query }))
            .await?;
        Ok(json_result(&data.pages.search_tags))
    }
}

// ---------------------------------------------------------------------------
// wikijs_update_tag
// ---------------------------------------------------------------------------

const UPDATE_TAG: &str = r#"
mutation UpdateTag($id: Int!, $tag: String!, $title: String!) {
  pages {
    updateTag(id: $id, tag: $tag, title: $title) {
      responseResult {
        succeeded
        errorCode
        slug
        message
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateTagInput {
    #[serde(default)]
    confirm: String,
    id: i64,
    tag: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct UpdateTagData {
    pages: UpdateTagPages,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTagPages {
    update_tag: TagMutationPayload,
}

pub struct UpdateTag;

#[async_trait]
impl Tool for UpdateTag {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_update_tag".to_string(),
            description: "Rename a tag or change its title. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": "Must match WIKI_MUTATION_CONFIRM_TOKEN if set." },
                    "id": { "type": "integer", "minimum": 1, "description": "Tag ID." },
                    "tag": { "type": "string", "minLength": 1, "description": "New tag key." },
                    "title": { "type": "string", "minLength": 1, "description": "New tag display title." }
                },
                "required": ["id", "tag", "title"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(false)),
        }
    }

    fn context(&self) -> &'static str {
        "update tag"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: UpdateTagInput = decode(arguments)?;
        audited(ctx, "updateTag", self.apply(ctx, &input)).await
    }
}

impl UpdateTag {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &UpdateTagInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let target = json!({ "id": input.id, "tag": input.tag, "title": input.title });
        if let Some(preview) = dry_run(ctx, "updateTag", target.clone()) {
            return Ok(preview);
        }

        let data: UpdateTagData = ctx.mutate(UPDATE_TAG, target.clone()).await?;
        let payload = data.pages.update_tag;
        Ok(finish(
            ctx,
            "updateTag",
            self.context(),
            &payload.response_result,
            target,
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_delete_tag
// ---------------------------------------------------------------------------

const DELETE_TAG: &str = r#"
mutation DeleteTag($id: Int!) {
  pages {
    deleteTag(id: $id) {
      responseResult {
        succeeded
        errorCode
        slug
        message
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeleteTagInput {
    #[serde(default)]
    confirm: String,
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DeleteTagData {
    pages: DeleteTagPages,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteTagPages {
    delete_tag: TagMutationPayload,
}

pub struct DeleteTag;

#[async_trait]
impl Tool for DeleteTag {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_delete_tag".to_string(),
            description: "Delete a tag from all pages. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": "Must match WIKI_MUTATION_CONFIRM_TOKEN if set." },
                    "id": { "type": "integer", "minimum": 1, "description": "Tag ID." }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "delete tag"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: DeleteTagInput = decode(arguments)?;
        audited(ctx, "deleteTag", self.apply(ctx, &input)).await
    }
}

impl DeleteTag {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &DeleteTagInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let target = json!({ "id": input.id });
        if let Some(preview) = dry_run(ctx, "deleteTag", target.clone()) {
            return Ok(preview);
        }

        let data: DeleteTagData = ctx.mutate(DELETE_TAG, target.clone()).await?;
        let payload = data.pages.delete_tag;
        Ok(finish(
            ctx,
            "deleteTag",
            self.context(),
            &payload.response_result,
            target,
            &payload,
        ))
    }
}

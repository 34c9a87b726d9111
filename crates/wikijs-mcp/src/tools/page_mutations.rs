//! Page write tools: create, update, delete, move, restore.
//!
//! Every tool here is path-scoped. Tools addressed by page id look the current
//! path up first; the lookup is a read and must finish before the scope check,
//! which must pass before the mutation is sent.

use super::Tool;
use crate::context::ToolContext;
use crate::input::decode;
use crate::mutation::{audited, dry_run, finish, lookup_page_path};
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ResponseResult, ToolError, WikiError, normalize_wiki_path};

const CONFIRM_DESCRIPTION: &str =
    "Must match WIKI_MUTATION_CONFIRM_TOKEN if set. Optional when the token is not configured.";

/// Page summary returned by create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: i64,
    pub path: String,
    pub title: Option<String>,
    pub updated_at: Option<String>,
}

/// Payload of create and update.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMutationPayload {
    pub response_result: ResponseResult,
    #[serde(default)]
    pub page: Option<PageSummary>,
}

/// Payload of delete, move and restore.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOnlyPayload {
    pub response_result: ResponseResult,
}

// ---------------------------------------------------------------------------
// wikijs_create_page
// ---------------------------------------------------------------------------

const CREATE_PAGE: &str = r#"
mutation CreatePage(
  $content: String!
  $description: String!
  $editor: String!
  $isPublished: Boolean!
  $isPrivate: Boolean!
  $locale: String!
  $path: String!
  $tags: [String]!
  $title: String!
) {
  pages {
    create(
      content: $content
      description: $description
      editor: $editor
      isPublished: $isPublished
      isPrivate: $isPrivate
      locale: $locale
      path: $path
      tags: $tags
      title: $title
    ) {
      responseResult {
        succeeded
        errorCode
        slug
        message
      }
      page {
        id
        path
        title
        updatedAt
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CreatePageInput {
    #[serde(default)]
    confirm: String,
    path: String,
    title: String,
    content: String,
    description: Option<String>,
    locale: Option<String>,
    editor: Option<String>,
    tags: Option<Vec<String>>,
    is_published: Option<bool>,
    is_private: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CreatePageData {
    pages: CreatePagePages,
}

#[derive(Debug, Deserialize)]
struct CreatePagePages {
    create: PageMutationPayload,
}

pub struct CreatePage;

#[async_trait]
impl Tool for CreatePage {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_create_page".to_string(),
            description: "Create a new page. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "path": { "type": "string", "minLength": 1, "description": "Target page path." },
                    "title": { "type": "string", "minLength": 1, "description": "Page title." },
                    "content": { "type": "string", "description": "Raw source content." },
                    "description": { "type": "string", "description": "Short page description." },
                    "locale": { "type": "string", "description": "Locale code. Defaults to WIKI_DEFAULT_LOCALE." },
                    "editor": { "type": "string", "description": "Editor key (markdown, asciidoc, html, etc). Defaults to WIKI_DEFAULT_EDITOR." },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Optional string tags." },
                    "isPublished": { "type": "boolean", "description": "Defaults true." },
                    "isPrivate": { "type": "boolean", "description": "Defaults false." }
                },
                "required": ["path", "title", "content"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(false)),
        }
    }

    fn context(&self) -> &'static str {
        "create page"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: CreatePageInput = decode(arguments)?;
        audited(ctx, "create", self.apply(ctx, &input)).await
    }
}

impl CreatePage {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &CreatePageInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;
        let path = normalize_wiki_path(&input.path);
        ctx.gate().enforce_path_allowed(&path)?;

        let locale = ctx.locale_or_default(input.locale.as_deref());
        let target = json!({ "path": path, "locale": locale, "title": input.title });
        if let Some(preview) = dry_run(ctx, "create", target) {
            return Ok(preview);
        }

        let variables = json!({
            "content": input.content,
            "description": input.description.as_deref().unwrap_or(""),
            "editor": input.editor.as_deref().unwrap_or(&ctx.defaults().editor),
            "isPublished": input.is_published.unwrap_or(true),
            "isPrivate": input.is_private.unwrap_or(false),
            "locale": locale,
            "path": path,
            "tags": input.tags.clone().unwrap_or_default(),
            "title": input.title,
        });
        let data: CreatePageData = ctx.mutate(CREATE_PAGE, variables).await?;
        let payload = data.pages.create;

        let fields = json!({
            "path": payload.page.as_ref().map(|p| p.path.as_str()).unwrap_or(&path),
            "id": payload.page.as_ref().map(|p| p.id),
        });
        Ok(finish(
            ctx,
            "create",
            self.context(),
            &payload.response_result,
            fields,
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_update_page
// ---------------------------------------------------------------------------

const MAX_SCRIPT_CHARS: u64 = 10_000;

const UPDATE_PAGE: &str = r#"
mutation UpdatePage(
  $id: Int!
  $content: String
  $description: String
  $editor: String
  $isPrivate: Boolean
  $isPublished: Boolean
  $locale: String
  $path: String
  $tags: [String]
  $title: String
  $publishStartDate: Date
  $publishEndDate: Date
  $scriptCss: String
  $scriptJs: String
) {
  pages {
    update(
      id: $id
      content: $content
      description: $description
      editor: $editor
      isPrivate: $isPrivate
      isPublished: $isPublished
      locale: $locale
      path: $path
      tags: $tags
      title: $title
      publishStartDate: $publishStartDate
      publishEndDate: $publishEndDate
      scriptCss: $scriptCss
      scriptJs: $scriptJs
    ) {
      responseResult {
        succeeded
        errorCode
        slug
        message
      }
      page {
        id
        path
        title
        updatedAt
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UpdatePageInput {
    #[serde(default)]
    confirm: String,
    id: i64,
    title: Option<String>,
    content: Option<String>,
    description: Option<String>,
    path: Option<String>,
    locale: Option<String>,
    editor: Option<String>,
    tags: Option<Vec<String>>,
    is_published: Option<bool>,
    is_private: Option<bool>,
    publish_start_date: Option<String>,
    publish_end_date: Option<String>,
    script_css: Option<String>,
    script_js: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatePageData {
    pages: UpdatePagePages,
}

#[derive(Debug, Deserialize)]
struct UpdatePagePages {
    update: PageMutationPayload,
}

pub struct UpdatePage;

#[async_trait]
impl Tool for UpdatePage {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_update_page".to_string(),
            description: "Update an existing page by ID. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "id": { "type": "integer", "minimum": 1, "description": "Page ID to update." },
                    "title": { "type": "string" },
                    "content": { "type": "string", "description": "Page content in the page's editor format." },
                    "description": { "type": "string" },
                    "path": { "type": "string", "description": "New path. Must also be inside the allowed prefixes." },
                    "locale": { "type": "string" },
                    "editor": { "type": "string" },
                    "tags": { "type": "array", "items": { "type": "string" }, "description": "Replaces the page's tags. Defaults to an empty list." },
                    "isPublished": { "type": "boolean" },
                    "isPrivate": { "type": "boolean" },
                    "publishStartDate": { "type": "string", "description": "Publication start date (ISO 8601 format)." },
                    "publishEndDate": { "type": "string", "description": "Publication end date (ISO 8601 format)." },
                    "scriptCss": { "type": "string", "maxLength": MAX_SCRIPT_CHARS, "description": "Custom CSS for the page. Max 10,000 chars." },
                    "scriptJs": {
                        "type": "string",
                        "maxLength": MAX_SCRIPT_CHARS,
                        "description": "Custom JavaScript for the page. Executes in every visitor's browser. Max 10,000 chars."
                    }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "update page"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: UpdatePageInput = decode(arguments)?;
        audited(ctx, "update", self.apply(ctx, &input)).await
    }
}

impl UpdatePage {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &UpdatePageInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let current_path = lookup_page_path(ctx, input.id).await?;
        ctx.gate().enforce_path_allowed(&current_path)?;

        let new_path = input
            .path
            .as_deref()
            .map(normalize_wiki_path)
            .filter(|path| !path.is_empty());
        if let Some(new_path) = new_path.as_deref().filter(|p| *p != current_path) {
            ctx.gate().enforce_path_allowed(new_path)?;
        }
        let target_path = new_path.clone().unwrap_or_else(|| current_path.clone());

        let target = json!({ "id": input.id, "path": target_path, "locale": input.locale });
        if let Some(preview) = dry_run(ctx, "update", target) {
            return Ok(preview);
        }

        // Wiki.js fails on a missing tags argument, so it is always sent.
        let variables = json!({
            "id": input.id,
            "content": input.content,
            "description": input.description,
            "editor": input.editor,
            "isPrivate": input.is_private,
            "isPublished": input.is_published,
            "locale": input.locale,
            "path": new_path,
            "tags": input.tags.clone().unwrap_or_default(),
            "title": input.title,
            "publishStartDate": input.publish_start_date,
            "publishEndDate": input.publish_end_date,
            "scriptCss": input.script_css,
            "scriptJs": input.script_js,
        });
        let data: UpdatePageData = ctx.mutate(UPDATE_PAGE, variables).await?;
        let payload = data.pages.update;

        let fields = json!({
            "id": payload.page.as_ref().map(|p| p.id).unwrap_or(input.id),
            "path": payload.page.as_ref().map(|p| p.path.as_str()).unwrap_or(&target_path),
        });
        Ok(finish(
            ctx,
            "update",
            self.context(),
            &payload.response_result,
            fields,
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_delete_page
// ---------------------------------------------------------------------------

const DELETE_PAGE: &str = r#"
mutation DeletePage($id: Int!) {
  pages {
    delete(id: $id) {
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
struct DeletePageInput {
    #[serde(default)]
    confirm: String,
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DeletePageData {
    pages: DeletePagePages,
}

#[derive(Debug, Deserialize)]
struct DeletePagePages {
    delete: ResponseOnlyPayload,
}

pub struct DeletePage;

#[async_trait]
impl Tool for DeletePage {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_delete_page".to_string(),
            description: "Delete a page by ID. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "id": { "type": "integer", "minimum": 1, "description": "Page ID to delete." }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "delete page"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: DeletePageInput = decode(arguments)?;
        audited(ctx, "delete", self.apply(ctx, &input)).await
    }
}

impl DeletePage {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &DeletePageInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let path = lookup_page_path(ctx, input.id).await?;
        ctx.gate().enforce_path_allowed(&path)?;

        let target = json!({ "id": input.id, "path": path });
        if let Some(preview) = dry_run(ctx, "delete", target.clone()) {
            return Ok(preview);
        }

        let data: DeletePageData = ctx.mutate(DELETE_PAGE, json!({ "id": input.id })).await?;
        let payload = data.pages.delete;
        Ok(finish(
            ctx,
            "delete",
            self.context(),
            &payload.response_result,
            target,
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_move_page
// ---------------------------------------------------------------------------

const MOVE_PAGE: &str = r#"
mutation MovePage($id: Int!, $destinationPath: String!, $destinationLocale: String!) {
  pages {
    move(id: $id, destinationPath: $destinationPath, destinationLocale: $destinationLocale) {
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
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct MovePageInput {
    #[serde(default)]
    confirm: String,
    id: i64,
    destination_path: String,
    destination_locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovePageData {
    pages: MovePagePages,
}

#[derive(Debug, Deserialize)]
struct MovePagePages {
    #[serde(rename = "move")]
    move_: ResponseOnlyPayload,
}

pub struct MovePage;

#[async_trait]
impl Tool for MovePage {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_move_page".to_string(),
            description: "Move or rename a page to a new path. Both the current and the destination path must be inside the allowed prefixes. Requires WIKI_MUTATIONS_ENABLED=true.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "id": { "type": "integer", "minimum": 1, "description": "Page ID to move." },
                    "destinationPath": { "type": "string", "minLength": 1, "description": "New page path." },
                    "destinationLocale": { "type": "string", "description": "Destination locale. Defaults to WIKI_DEFAULT_LOCALE." }
                },
                "required": ["id", "destinationPath"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "move page"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: MovePageInput = decode(arguments)?;
        audited(ctx, "move", self.apply(ctx, &input)).await
    }
}

impl MovePage {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &MovePageInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let source_path = lookup_page_path(ctx, input.id).await?;
        ctx.gate().enforce_path_allowed(&source_path)?;

        let destination_path = normalize_wiki_path(&input.destination_path);
        if destination_path.is_empty() {
            return Err(WikiError::validation(
                "destinationPath must contain at least one path segment.",
            ));
        }
        ctx.gate().enforce_path_allowed(&destination_path)?;

        let target = json!({
            "id": input.id,
            "sourcePath": source_path,
            "destinationPath": destination_path,
            "destinationLocale": input.destination_locale,
        });
        if let Some(preview) = dry_run(ctx, "move", target.clone()) {
            return Ok(preview);
        }

        let variables = json!({
            "id": input.id,
            "destinationPath": destination_path,
            "destinationLocale": ctx.locale_or_default(input.destination_locale.as_deref()),
        });
        let data: MovePageData = ctx.mutate(MOVE_PAGE, variables).await?;
        let payload = data.pages.move_;
        Ok(finish(
            ctx,
            "move",
            self.context(),
            &payload.response_result,
            target,
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_restore_page
// ---------------------------------------------------------------------------

const RESTORE_PAGE: &str = r#"
mutation RestorePage($pageId: Int!, $versionId: Int!) {
  pages {
    restore(pageId: $pageId, versionId: $versionId) {
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
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RestorePageInput {
    #[serde(default)]
    confirm: String,
    id: i64,
    version_id: i64,
}

#[derive(Debug, Deserialize)]
struct RestorePageData {
    pages: RestorePagePages,
}

#[derive(Debug, Deserialize)]
struct RestorePagePages {
    restore: ResponseOnlyPayload,
}

pub struct RestorePage;

#[async_trait]
impl Tool for RestorePage {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_restore_page".to_string(),
            description: "Restore a page to a previous version from its history. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "id": { "type": "integer", "minimum": 1, "description": "Page ID to restore." },
                    "versionId": { "type": "integer", "minimum": 1, "description": "Version ID from wikijs_get_page_history." }
                },
                "required": ["id", "versionId"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "restore page"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: RestorePageInput = decode(arguments)?;
        audited(ctx, "restore", self.apply(ctx, &input)).await
    }
}

impl RestorePage {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &RestorePageInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let path = lookup_page_path(ctx, input.id).await?;
        ctx.gate().enforce_path_allowed(&path)?;

        let target = json!({ "id": input.id, "path": path, "versionId": input.version_id });
        if let Some(preview) = dry_run(ctx, "restore", target.clone()) {
            return Ok(preview);
        }

        let data: RestorePageData = ctx
            .mutate(
                RESTORE_PAGE,
                json!({ "pageId": input.id, "versionId": input.version_id }),
            )
            .await?;
        let payload = data.pages.restore;
        Ok(finish(
            ctx,
            "restore",
            self.context(),
            &payload.response_result,
            target,
            &payload,
        ))
    }
}

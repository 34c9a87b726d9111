//! Comment tools.
//!
//! Creating a comment is scoped by the path of the page it lands on. Update
//! and delete address a comment by id and the API offers no way to resolve
//! its page, so they are gated but not path-scoped.

use super::Tool;
use crate::context::ToolContext;
use crate::input::decode;
use crate::mutation::{audited, content_preview, dry_run, finish, lookup_page_path};
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ResponseResult, ToolError, WikiError, json_result};

const CONFIRM_DESCRIPTION: &str =
    "Must match WIKI_MUTATION_CONFIRM_TOKEN if set. Optional when the token is not configured.";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    #[serde(rename = "authorIP")]
    pub author_ip: Option<String>,
    pub content: Option<String>,
    pub render: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Payload of comment update and delete.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentMutationPayload {
    pub response_result: ResponseResult,
}

// ---------------------------------------------------------------------------
// wikijs_list_comments
// ---------------------------------------------------------------------------

const LIST_COMMENTS: &str = r#"
query ListComments($locale: String!, $path: String!) {
  comments {
    list(locale: $locale, path: $path) {
      id
      authorId
      authorName
      authorEmail
      authorIP
      content
      render
      createdAt
      updatedAt
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListCommentsInput {
    path: String,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListCommentsData {
    comments: ListCommentsInner,
}

#[derive(Debug, Deserialize)]
struct ListCommentsInner {
    #[serde(default)]
    list: Vec<Comment>,
}

pub struct ListComments;

#[async_trait]
impl Tool for ListComments {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_list_comments".to_string(),
            description: "List comments on a page, identified by path and locale.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "minLength": 1, "description": "Page path without a leading slash." },
                    "locale": { "type": "string", "description": "Locale code. Defaults to WIKI_DEFAULT_LOCALE." }
                },
                "required": ["path"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "list comments"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: ListCommentsInput = decode(arguments)?;
        let variables = json!({
            "locale": ctx.locale_or_default(input.locale.as_deref()),
            "path": wikijs_core::normalize_wiki_path(&input.path),
        });
        let data: ListCommentsData = ctx.graphql(LIST_COMMENTS, variables).await?;
        Ok(json_result(&data.comments.list))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_comment
// ---------------------------------------------------------------------------

const GET_COMMENT: &str = r#"
query GetComment($id: Int!) {
  comments {
    single(id: $id) {
      id
      authorId
      authorName
      authorEmail
      authorIP
      content
      render
      createdAt
      updatedAt
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetCommentInput {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct GetCommentData {
    comments: GetCommentInner,
}

#[derive(Debug, Deserialize)]
struct GetCommentInner {
    single: Option<Comment>,
}

pub struct GetComment;

#[async_trait]
impl Tool for GetComment {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_comment".to_string(),
            description: "Get a single comment by ID.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1, "description": "Comment ID." }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get comment"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetCommentInput = decode(arguments)?;
        let data: GetCommentData = ctx.graphql(GET_COMMENT, json!({ "id": input.id })).await?;
        let comment = data.comments.single.ok_or_else(|| {
            WikiError::not_found(format!("Comment with id {} not found.", input.id))
        })?;
        Ok(json_result(&comment))
    }
}

// ---------------------------------------------------------------------------
// wikijs_create_comment
// ---------------------------------------------------------------------------

const CREATE_COMMENT: &str = r#"
mutation CreateComment(
  $pageId: Int!
  $replyTo: Int
  $content: String!
  $guestName: String
  $guestEmail: String
) {
  comments {
    create(
      pageId: $pageId
      replyTo: $replyTo
      content: $content
      guestName: $guestName
      guestEmail: $guestEmail
    ) {
      responseResult {
        succeeded
        errorCode
        slug
        message
      }
      id
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CreateCommentInput {
    #[serde(default)]
    confirm: String,
    page_id: i64,
    content: String,
    reply_to: Option<i64>,
    guest_name: Option<String>,
    guest_email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateCommentData {
    comments: CreateCommentInner,
}

#[derive(Debug, Deserialize)]
struct CreateCommentInner {
    create: CreateCommentPayload,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentPayload {
    pub response_result: ResponseResult,
    #[serde(default)]
    pub id: Option<i64>,
}

pub struct CreateComment;

#[async_trait]
impl Tool for CreateComment {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_create_comment".to_string(),
            description: "Post a comment on a page. The page's path must be inside the allowed prefixes. Requires WIKI_MUTATIONS_ENABLED=true.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "pageId": { "type": "integer", "minimum": 1, "description": "ID of the page to comment on." },
                    "content": { "type": "string", "minLength": 1, "description": "Comment content (markdown)." },
                    "replyTo": { "type": "integer", "minimum": 1, "description": "Parent comment ID for threaded replies." },
                    "guestName": { "type": "string", "description": "Display name for guest comments." },
                    "guestEmail": { "type": "string", "description": "Email for guest comments." }
                },
                "required": ["pageId", "content"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(false)),
        }
    }

    fn context(&self) -> &'static str {
        "create comment"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: CreateCommentInput = decode(arguments)?;
        audited(ctx, "create_comment", self.apply(ctx, &input)).await
    }
}

impl CreateComment {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &CreateCommentInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let path = lookup_page_path(ctx, input.page_id).await?;
        ctx.gate().enforce_path_allowed(&path)?;

        let target = json!({
            "pageId": input.page_id,
            "path": path,
            "contentPreview": content_preview(&input.content),
        });
        if let Some(preview) = dry_run(ctx, "create_comment", target) {
            return Ok(preview);
        }

        let variables = json!({
            "pageId": input.page_id,
            "replyTo": input.reply_to,
            "content": input.content,
            "guestName": input.guest_name,
            "guestEmail": input.guest_email,
        });
        let data: CreateCommentData = ctx.mutate(CREATE_COMMENT, variables).await?;
        let payload = data.comments.create;

        let fields = json!({ "pageId": input.page_id, "path": path, "commentId": payload.id });
        Ok(finish(
            ctx,
            "create_comment",
            self.context(),
            &payload.response_result,
            fields,
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_update_comment
// ---------------------------------------------------------------------------

const UPDATE_COMMENT: &str = r#"
mutation UpdateComment($id: Int!, $content: String!) {
  comments {
    update(id: $id, content: $content) {
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
struct UpdateCommentInput {
    #[serde(default)]
    confirm: String,
    id: i64,
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpdateCommentData {
    comments: UpdateCommentInner,
}

#[derive(Debug, Deserialize)]
struct UpdateCommentInner {
    update: CommentMutationPayload,
}

pub struct UpdateComment;

#[async_trait]
impl Tool for UpdateComment {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_update_comment".to_string(),
            description: "Edit the content of an existing comment. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "id": { "type": "integer", "minimum": 1, "description": "Comment ID." },
                    "content": { "type": "string", "minLength": 1, "description": "New comment content." }
                },
                "required": ["id", "content"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "update comment"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: UpdateCommentInput = decode(arguments)?;
        audited(ctx, "update_comment", self.apply(ctx, &input)).await
    }
}

impl UpdateComment {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &UpdateCommentInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let target = json!({ "id": input.id, "contentPreview": content_preview(&input.content) });
        if let Some(preview) = dry_run(ctx, "update_comment", target) {
            return Ok(preview);
        }

        let data: UpdateCommentData = ctx
            .mutate(
                UPDATE_COMMENT,
                json!({ "id": input.id, "content": input.content }),
            )
            .await?;
        let payload = data.comments.update;
        Ok(finish(
            ctx,
            "update_comment",
            self.context(),
            &payload.response_result,
            json!({ "id": input.id }),
            &payload,
        ))
    }
}

// ---------------------------------------------------------------------------
// wikijs_delete_comment
// ---------------------------------------------------------------------------

const DELETE_COMMENT: &str = r#"
mutation DeleteComment($id: Int!) {
  comments {
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
struct DeleteCommentInput {
    #[serde(default)]
    confirm: String,
    id: i64,
}

#[derive(Debug, Deserialize)]
struct DeleteCommentData {
    comments: DeleteCommentInner,
}

#[derive(Debug, Deserialize)]
struct DeleteCommentInner {
    delete: CommentMutationPayload,
}

pub struct DeleteComment;

#[async_trait]
impl Tool for DeleteComment {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_delete_comment".to_string(),
            description: "Delete a comment by ID. Requires WIKI_MUTATIONS_ENABLED=true. confirm is only checked when WIKI_MUTATION_CONFIRM_TOKEN is set.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "confirm": { "type": "string", "description": CONFIRM_DESCRIPTION },
                    "id": { "type": "integer", "minimum": 1, "description": "Comment ID." }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::write(true)),
        }
    }

    fn context(&self) -> &'static str {
        "delete comment"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: DeleteCommentInput = decode(arguments)?;
        audited(ctx, "delete_comment", self.apply(ctx, &input)).await
    }
}

impl DeleteComment {
    async fn apply(
        &self,
        ctx: &ToolContext,
        input: &DeleteCommentInput,
    ) -> Result<CallToolResult, WikiError> {
        ctx.gate().enforce_mutation_safety(&input.confirm)?;

        let target = json!({ "id": input.id });
        if let Some(preview) = dry_run(ctx, "delete_comment", target.clone()) {
            return Ok(preview);
        }

        let data: DeleteCommentData = ctx.mutate(DELETE_COMMENT, target.clone()).await?;
        let payload = data.comments.delete;
        Ok(finish(
            ctx,
            "delete_comment",
            self.context(),
            &payload.response_result,
            target,
            &payload,
        ))
    }
}

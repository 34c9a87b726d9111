//! The pipeline every write tool runs through.
//!
//! 1. input is validated by the registry before the tool runs
//! 2. mutation enablement, then the confirm token
//! 3. path scope, resolving the page path by id first where needed
//! 4. dry-run short-circuit with a uniform preview
//! 5. the mutation itself, never retried
//! 6. an audit record for every outcome
//! 7. a failed `responseResult` or a thrown error is classified and formatted

use crate::context::ToolContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::future::Future;
use wikijs_core::{
    CallToolResult, ResponseResult, ToolError, WikiError, classify_response_result, json_result,
};

/// Message carried by every dry-run preview.
pub const DRY_RUN_MESSAGE: &str =
    "Mutation dry-run is enabled. Set WIKI_MUTATION_DRY_RUN=false to perform write operations.";

/// Length of the comment content excerpt shown in previews.
pub const CONTENT_PREVIEW_CHARS: usize = 100;

const PAGE_PATH_QUERY: &str = r#"
query GetPagePath($id: Int!) {
  pages {
    single(id: $id) {
      path
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct PagePathData {
    pages: PagePathPages,
}

#[derive(Debug, Deserialize)]
struct PagePathPages {
    single: Option<PagePath>,
}

#[derive(Debug, Deserialize)]
struct PagePath {
    path: Option<String>,
}

/// Preview returned instead of performing a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunPreview {
    pub dry_run: bool,
    pub operation: String,
    pub message: String,
    pub target: Value,
}

/// Look up a page's path by id. A read, so it retries normally.
pub async fn lookup_page_path(ctx: &ToolContext, id: i64) -> Result<String, WikiError> {
    let data: PagePathData = ctx.graphql(PAGE_PATH_QUERY, json!({ "id": id })).await?;
    data.pages
        .single
        .and_then(|page| page.path)
        .filter(|path| !path.is_empty())
        .ok_or_else(|| WikiError::not_found(format!("Cannot resolve path for page id {}.", id)))
}

/// Run a write tool body, auditing any error it returns.
pub async fn audited<F>(
    ctx: &ToolContext,
    operation: &str,
    body: F,
) -> Result<CallToolResult, ToolError>
where
    F: Future<Output = Result<CallToolResult, WikiError>>,
{
    match body.await {
        Ok(result) => Ok(result),
        Err(err) => {
            ctx.audit().record(
                operation,
                &json!({ "succeeded": false, "error": err.message }),
            );
            Err(err.into())
        }
    }
}

/// When dry-run is on, audit and return the preview for `target`.
pub fn dry_run(ctx: &ToolContext, operation: &str, target: Value) -> Option<CallToolResult> {
    if !ctx.gate().is_dry_run() {
        return None;
    }

    let preview = DryRunPreview {
        dry_run: true,
        operation: operation.to_string(),
        message: DRY_RUN_MESSAGE.to_string(),
        target,
    };
    tracing::info!(operation, "Mutation dry-run preview");
    ctx.audit()
        .record(operation, &serde_json::to_value(&preview).unwrap_or(Value::Null));
    Some(json_result(&preview))
}

/// Audit a completed mutation and build its result.
///
/// `fields` are the target identifiers added to the audit record. A failed
/// `responseResult` is classified with `context`; otherwise `payload` is returned.
pub fn finish<P: Serialize>(
    ctx: &ToolContext,
    operation: &str,
    context: &str,
    response: &ResponseResult,
    fields: Value,
    payload: &P,
) -> CallToolResult {
    let mut details = Map::new();
    details.insert("dryRun".into(), Value::Bool(false));
    details.insert("succeeded".into(), Value::Bool(response.succeeded));
    if let Value::Object(fields) = fields {
        details.extend(fields);
    }
    details.insert("errorCode".into(), json!(response.error_code));
    details.insert("message".into(), json!(response.message));
    ctx.audit().record(operation, &Value::Object(details));

    if response.succeeded {
        json_result(payload)
    } else {
        tracing::warn!(
            operation,
            error_code = ?response.error_code,
            "Wiki.js rejected mutation"
        );
        classify_response_result(response, context)
    }
}

/// First [`CONTENT_PREVIEW_CHARS`] characters of `content`.
pub fn content_preview(content: &str) -> String {
    content.chars().take(CONTENT_PREVIEW_CHARS).collect()
}

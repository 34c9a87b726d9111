//! Read-only page tools.

use super::Tool;
use crate::context::ToolContext;
use crate::input::decode;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ToolError, WikiError, json_result};

/// A tag reference as returned inside page objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTag {
    pub tag: String,
}

// ---------------------------------------------------------------------------
// wikijs_search_pages
// ---------------------------------------------------------------------------

const SEARCH_PAGES: &str = r#"
query SearchPages($query: String!, $path: String, $locale: String) {
  pages {
    search(query: $query, path: $path, locale: $locale) {
      totalHits
      suggestions
      results {
        id
        title
        description
        path
        locale
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchPagesInput {
    query: String,
    locale: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPagesData {
    pages: SearchPagesPages,
}

#[derive(Debug, Deserialize)]
struct SearchPagesPages {
    search: PageSearchResponse,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSearchResponse {
    pub total_hits: Option<i64>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub results: Vec<PageSearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageSearchResult {
    /// Search ids are strings in the Wiki.js schema.
    pub id: Value,
    pub title: Option<String>,
    pub description: Option<String>,
    pub path: String,
    pub locale: Option<String>,
}

pub struct SearchPages;

#[async_trait]
impl Tool for SearchPages {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_search_pages".to_string(),
            description: "Search pages by keyword and return path/title summary for knowledge lookup."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "minLength": 1, "description": "Search keyword." },
                    "locale": { "type": "string", "description": "Optional locale code. Defaults to WIKI_DEFAULT_LOCALE." },
                    "path": { "type": "string", "description": "Optional path prefix to scope search." }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "search pages"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: SearchPagesInput = decode(arguments)?;
        let locale = ctx.locale_or_default(input.locale.as_deref());

        let data: SearchPagesData = ctx
            .graphql(
                SEARCH_PAGES,
                json!({ "query": input.query, "path": input.path, "locale": locale }),
            )
            .await?;
        Ok(json_result(&data.pages.search))
    }
}

// ---------------------------------------------------------------------------
// wikijs_list_pages
// ---------------------------------------------------------------------------

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

const LIST_PAGES: &str = r#"
query ListPages($limit: Int, $locale: String) {
  pages {
    list(limit: $limit, orderBy: UPDATED, orderByDirection: DESC, locale: $locale) {
      id
      path
      locale
      title
      description
      contentType
      isPublished
      isPrivate
      tags
      updatedAt
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListPagesInput {
    locale: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ListPagesData {
    pages: ListPagesPages,
}

#[derive(Debug, Deserialize)]
struct ListPagesPages {
    #[serde(default)]
    list: Vec<PageListItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListItem {
    pub id: i64,
    pub path: String,
    pub locale: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub is_published: Option<bool>,
    pub is_private: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub updated_at: Option<String>,
}

pub struct ListPages;

#[async_trait]
impl Tool for ListPages {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_list_pages".to_string(),
            description: "List pages for crawling/indexing with optional locale and limit."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "locale": { "type": "string", "description": "Optional locale code." },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": MAX_LIST_LIMIT,
                        "description": "Optional item limit. Default 50, max 200."
                    }
                },
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "list pages"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: ListPagesInput = decode(arguments)?;
        let limit = input.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let locale = ctx.locale_or_default(input.locale.as_deref());

        let data: ListPagesData = ctx
            .graphql(LIST_PAGES, json!({ "limit": limit, "locale": locale }))
            .await?;
        Ok(json_result(&data.pages.list))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_page_by_path
// ---------------------------------------------------------------------------

const GET_PAGE_BY_PATH: &str = r#"
query GetPageByPath($path: String!, $locale: String!) {
  pages {
    singleByPath(path: $path, locale: $locale) {
      id
      path
      locale
      title
      description
      contentType
      content
      createdAt
      updatedAt
      authorId
      authorName
      creatorId
      creatorName
      tags {
        tag
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetPageByPathInput {
    path: String,
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPageByPathData {
    pages: GetPageByPathPages,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetPageByPathPages {
    single_by_path: Option<PageDetail>,
}

/// A full page including its source content.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetail {
    pub id: i64,
    pub path: String,
    pub locale: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_type: Option<String>,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<PageTag>,
}

pub struct GetPageByPath;

#[async_trait]
impl Tool for GetPageByPath {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_page_by_path".to_string(),
            description: "Get a single page body/content using path + locale.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "minLength": 1, "description": "Wiki page path, without leading slash." },
                    "locale": { "type": "string", "description": "Locale code." }
                },
                "required": ["path"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get page by path"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetPageByPathInput = decode(arguments)?;
        let locale = ctx.locale_or_default(input.locale.as_deref());

        let data: GetPageByPathData = ctx
            .graphql(
                GET_PAGE_BY_PATH,
                json!({ "path": input.path, "locale": locale }),
            )
            .await?;

        let page = data.pages.single_by_path.ok_or_else(|| {
            WikiError::not_found(format!(
                "Page not found at path \"{}\" (locale: {}).",
                input.path, locale
            ))
        })?;
        Ok(json_result(&page))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_page_by_id
// ---------------------------------------------------------------------------

const GET_PAGE_BY_ID: &str = r#"
query GetPageById($id: Int!) {
  pages {
    single(id: $id) {
      id
      path
      locale
      title
      description
      contentType
      content
      updatedAt
      tags {
        tag
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetPageByIdInput {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct GetPageByIdData {
    pages: GetPageByIdPages,
}

#[derive(Debug, Deserialize)]
struct GetPageByIdPages {
    single: Option<PageDetail>,
}

pub struct GetPageById;

#[async_trait]
impl Tool for GetPageById {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_page_by_id".to_string(),
            description: "Get a single page body/content by numeric page ID.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1, "description": "Wiki page ID." }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get page by id"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetPageByIdInput = decode(arguments)?;

        let data: GetPageByIdData = ctx
            .graphql(GET_PAGE_BY_ID, json!({ "id": input.id }))
            .await?;

        let page = data.pages.single.ok_or_else(|| {
            WikiError::not_found(format!("Page with id={} not found.", input.id))
        })?;
        Ok(json_result(&page))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_page_tree
// ---------------------------------------------------------------------------

const GET_PAGE_TREE: &str = r#"
query GetPageTree(
  $path: String
  $parent: Int
  $mode: PageTreeMode!
  $locale: String!
  $includeAncestors: Boolean
) {
  pages {
    tree(
      path: $path
      parent: $parent
      mode: $mode
      locale: $locale
      includeAncestors: $includeAncestors
    ) {
      id
      path
      depth
      title
      isFolder
      pageId
      parent
      locale
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GetPageTreeInput {
    path: Option<String>,
    parent_id: Option<i64>,
    mode: Option<String>,
    locale: Option<String>,
    include_ancestors: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GetPageTreeData {
    pages: GetPageTreePages,
}

#[derive(Debug, Deserialize)]
struct GetPageTreePages {
    #[serde(default)]
    tree: Vec<PageTreeItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTreeItem {
    pub id: i64,
    pub path: String,
    pub depth: Option<i64>,
    pub title: Option<String>,
    pub is_folder: Option<bool>,
    pub page_id: Option<i64>,
    pub parent: Option<i64>,
    pub locale: Option<String>,
}

pub struct GetPageTree;

#[async_trait]
impl Tool for GetPageTree {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_page_tree".to_string(),
            description: "Get the page tree hierarchy for site navigation and structure discovery. Returns folders and/or pages with depth info.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": { "type": "string", "description": "Optional path prefix to scope the tree." },
                    "parentId": { "type": "integer", "minimum": 1, "description": "Optional parent page ID to get children of." },
                    "mode": { "type": "string", "enum": ["FOLDERS", "PAGES", "ALL"], "description": "Tree mode. Default ALL." },
                    "locale": { "type": "string", "description": "Locale code. Defaults to WIKI_DEFAULT_LOCALE." },
                    "includeAncestors": { "type": "boolean", "description": "Include ancestor pages. Default false." }
                },
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get page tree"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetPageTreeInput = decode(arguments)?;
        let locale = ctx.locale_or_default(input.locale.as_deref());

        let data: GetPageTreeData = ctx
            .graphql(
                GET_PAGE_TREE,
                json!({
                    "path": input.path,
                    "parent": input.parent_id,
                    "mode": input.mode.as_deref().unwrap_or("ALL"),
                    "locale": locale,
                    "includeAncestors": input.include_ancestors.unwrap_or(false),
                }),
            )
            .await?;
        Ok(json_result(&data.pages.tree))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_page_history
// ---------------------------------------------------------------------------

const DEFAULT_HISTORY_LIMIT: i64 = 25;
const MAX_HISTORY_LIMIT: i64 = 100;

const GET_PAGE_HISTORY: &str = r#"
query GetPageHistory($id: Int!, $offsetPage: Int, $offsetSize: Int) {
  pages {
    history(id: $id, offsetPage: $offsetPage, offsetSize: $offsetSize) {
      trail {
        versionId
        versionDate
        authorId
        authorName
        actionType
        valueBefore
        valueAfter
      }
      total
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetPageHistoryInput {
    id: i64,
    offset: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GetPageHistoryData {
    pages: GetPageHistoryPages,
}

#[derive(Debug, Deserialize)]
struct GetPageHistoryPages {
    history: PageHistory,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PageHistory {
    #[serde(default)]
    pub trail: Vec<PageHistoryEntry>,
    pub total: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHistoryEntry {
    pub version_id: i64,
    pub version_date: Option<String>,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub action_type: Option<String>,
    pub value_before: Option<String>,
    pub value_after: Option<String>,
}

pub struct GetPageHistory;

#[async_trait]
impl Tool for GetPageHistory {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_page_history".to_string(),
            description: "Get edit history trail for a page by ID. Returns version dates, authors, and change types.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1, "description": "Wiki page ID." },
                    "offset": { "type": "integer", "minimum": 0, "description": "Page offset for pagination. Default 0." },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": MAX_HISTORY_LIMIT,
                        "description": "Number of history entries. Default 25, max 100."
                    }
                },
                "required": ["id"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get page history"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetPageHistoryInput = decode(arguments)?;

        let data: GetPageHistoryData = ctx
            .graphql(
                GET_PAGE_HISTORY,
                json!({
                    "id": input.id,
                    "offsetPage": input.offset.unwrap_or(0),
                    "offsetSize": input.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
                }),
            )
            .await?;
        Ok(json_result(&data.pages.history))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_page_version
// ---------------------------------------------------------------------------

const GET_PAGE_VERSION: &str = r#"
query GetPageVersion($pageId: Int!, $versionId: Int!) {
  pages {
    version(pageId: $pageId, versionId: $versionId) {
      action
      authorId
      authorName
      content
      contentType
      createdAt
      description
      editor
      isPrivate
      isPublished
      locale
      pageId
      path
      publishEndDate
      publishStartDate
      tags
      title
      versionDate
      versionId
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct GetPageVersionInput {
    id: i64,
    version_id: i64,
}

#[derive(Debug, Deserialize)]
struct GetPageVersionData {
    pages: GetPageVersionPages,
}

#[derive(Debug, Deserialize)]
struct GetPageVersionPages {
    version: Option<PageVersion>,
}

/// A page as it was at one point in its history.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageVersion {
    pub action: Option<String>,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<String>,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub editor: Option<String>,
    pub is_private: Option<bool>,
    pub is_published: Option<bool>,
    pub locale: Option<String>,
    pub page_id: i64,
    pub path: Option<String>,
    pub publish_end_date: Option<String>,
    pub publish_start_date: Option<String>,
    /// Plain tag names here, unlike [`PageTag`] on live pages.
    #[serde(default)]
    pub tags: Vec<String>,
    pub title: Option<String>,
    pub version_date: Option<String>,
    pub version_id: i64,
}

pub struct GetPageVersion;

#[async_trait]
impl Tool for GetPageVersion {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_page_version".to_string(),
            description: "Get a specific version of a page by page ID and version ID. Returns full page content and metadata for that version.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1, "description": "Page ID." },
                    "versionId": { "type": "integer", "minimum": 1, "description": "Version ID from page history." }
                },
                "required": ["id", "versionId"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get page version"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetPageVersionInput = decode(arguments)?;

        let data: GetPageVersionData = ctx
            .graphql(
                GET_PAGE_VERSION,
                json!({ "pageId": input.id, "versionId": input.version_id }),
            )
            .await?;

        let version = data.pages.version.ok_or_else(|| {
            WikiError::not_found(format!(
                "Version {} of page id={} not found.",
                input.version_id, input.id
            ))
        })?;
        Ok(json_result(&version))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_page_links
// ---------------------------------------------------------------------------

const GET_PAGE_LINKS: &str = r#"
query GetPageLinks($locale: String!) {
  pages {
    links(locale: $locale) {
      id
      path
      title
      links
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetPageLinksInput {
    locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetPageLinksData {
    pages: GetPageLinksPages,
}

#[derive(Debug, Deserialize)]
struct GetPageLinksPages {
    #[serde(default)]
    links: Vec<PageLinks>,
}

/// A page and the paths it links to.
#[derive(Debug, Serialize, Deserialize)]
pub struct PageLinks {
    pub id: i64,
    pub path: String,
    pub title: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

pub struct GetPageLinks;

#[async_trait]
impl Tool for GetPageLinks {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_page_links".to_string(),
            description: "Get all pages and their outbound links for a locale. Returns an array of pages with their link relationships.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "locale": { "type": "string", "description": "Locale code. Defaults to WIKI_DEFAULT_LOCALE." }
                },
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get page links"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: GetPageLinksInput = decode(arguments)?;
        let locale = ctx.locale_or_default(input.locale.as_deref());

        let data: GetPageLinksData = ctx
            .graphql(GET_PAGE_LINKS, json!({ "locale": locale }))
            .await?;
        Ok(json_result(&data.pages.links))
    }
}

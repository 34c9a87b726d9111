//! Asset (uploaded file) listings.

use super::Tool;
use crate::context::ToolContext;
use crate::input::decode;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ToolError, json_result};

/// Folder id of the asset root.
const ROOT_FOLDER: i64 = 0;

/// Asset kind filter accepted by `assets.list`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetKind {
    Image,
    Binary,
    #[default]
    All,
}

// ---------------------------------------------------------------------------
// wikijs_list_assets
// ---------------------------------------------------------------------------

const LIST_ASSETS: &str = r#"
query ListAssets($folderId: Int!, $kind: AssetKind!) {
  assets {
    list(folderId: $folderId, kind: $kind) {
      id
      filename
      ext
      kind
      mime
      fileSize
      metadata
      createdAt
      updatedAt
      folder {
        id
        slug
      }
      author {
        id
        name
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ListAssetsInput {
    folder_id: Option<i64>,
    #[serde(default)]
    kind: AssetKind,
}

#[derive(Debug, Deserialize)]
struct ListAssetsData {
    assets: ListAssetsAssets,
}

#[derive(Debug, Deserialize)]
struct ListAssetsAssets {
    #[serde(default)]
    list: Vec<AssetItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetItem {
    pub id: i64,
    pub filename: String,
    pub ext: Option<String>,
    pub kind: Option<String>,
    pub mime: Option<String>,
    pub file_size: Option<i64>,
    pub metadata: Option<Value>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub folder: Option<AssetFolderRef>,
    pub author: Option<AssetAuthor>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetFolderRef {
    pub id: i64,
    pub slug: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetAuthor {
    pub id: i64,
    pub name: Option<String>,
}

pub struct ListAssets;

#[async_trait]
impl Tool for ListAssets {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_list_assets".to_string(),
            description: "List assets (files, images) in a specific folder. Returns asset metadata including filename, type, size, and upload date.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "folderId": { "type": "integer", "minimum": 0, "description": "Folder ID to list assets from. Default 0 (root folder)." },
                    "kind": { "type": "string", "enum": ["IMAGE", "BINARY", "ALL"], "description": "Asset type filter. Default ALL." }
                },
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "list assets"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: ListAssetsInput = decode(arguments)?;

        let data: ListAssetsData = ctx
            .graphql(
                LIST_ASSETS,
                json!({
                    "folderId": input.folder_id.unwrap_or(ROOT_FOLDER),
                    "kind": input.kind,
                }),
            )
            .await?;
        Ok(json_result(&data.assets.list))
    }
}

// ---------------------------------------------------------------------------
// wikijs_list_asset_folders
// ---------------------------------------------------------------------------

const LIST_ASSET_FOLDERS: &str = r#"
query ListAssetFolders($parentFolderId: Int!) {
  assets {
    folders(parentFolderId: $parentFolderId) {
      id
      slug
      name
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ListAssetFoldersInput {
    parent_folder_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ListAssetFoldersData {
    assets: ListAssetFoldersAssets,
}

#[derive(Debug, Deserialize)]
struct ListAssetFoldersAssets {
    #[serde(default)]
    folders: Vec<AssetFolder>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetFolder {
    pub id: i64,
    pub slug: String,
    pub name: Option<String>,
}

pub struct ListAssetFolders;

#[async_trait]
impl Tool for ListAssetFolders {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_list_asset_folders".to_string(),
            description: "List asset folders within a parent folder. Returns folder structure for navigating the asset hierarchy.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "parentFolderId": { "type": "integer", "minimum": 0, "description": "Parent folder ID. Default 0 (root level)." }
                },
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "list asset folders"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: ListAssetFoldersInput = decode(arguments)?;

        let data: ListAssetFoldersData = ctx
            .graphql(
                LIST_ASSET_FOLDERS,
                json!({ "parentFolderId": input.parent_folder_id.unwrap_or(ROOT_FOLDER) }),
            )
            .await?;
        Ok(json_result(&data.assets.folders))
    }
}

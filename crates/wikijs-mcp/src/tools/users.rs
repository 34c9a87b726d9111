//! User lookups: the API key's own profile and user search.

use super::Tool;
use crate::context::ToolContext;
use crate::input::decode;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ToolError, WikiError, json_result};

const GET_CURRENT_USER: &str = r#"
query GetCurrentUser {
  users {
    profile {
      id
      name
      email
      providerKey
      providerName
      isSystem
      isVerified
      location
      jobTitle
      timezone
      dateFormat
      appearance
      createdAt
      updatedAt
      lastLoginAt
      groups
      pagesTotal
    }
  }
}"#;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub provider_key: Option<String>,
    pub provider_name: Option<String>,
    pub is_system: Option<bool>,
    pub is_verified: Option<bool>,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub timezone: Option<String>,
    pub date_format: Option<String>,
    pub appearance: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    pub pages_total: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    users: ProfileUsers,
}

#[derive(Debug, Deserialize)]
struct ProfileUsers {
    profile: Option<UserProfile>,
}

pub struct GetCurrentUser;

#[async_trait]
impl Tool for GetCurrentUser {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_current_user".to_string(),
            description: "Get the profile of the user the API key belongs to. Useful for checking which identity and groups the server acts with.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get current user"
    }

    async fn run(&self, ctx: &ToolContext, _arguments: Value) -> Result<CallToolResult, ToolError> {
        let data: ProfileData = ctx.graphql(GET_CURRENT_USER, json!({})).await?;
        let profile = data
            .users
            .profile
            .ok_or_else(|| WikiError::not_found("No user profile is linked to this API key."))?;
        Ok(json_result(&profile))
    }
}

const SEARCH_USERS: &str = r#"
query SearchUsers($query: String!) {
  users {
    search(query: $query) {
      id
      name
      email
      providerKey
      isActive
      createdAt
      lastLoginAt
    }
  }
}"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchUsersInput {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchUsersData {
    users: SearchUsersUsers,
}

#[derive(Debug, Deserialize)]
struct SearchUsersUsers {
    #[serde(default)]
    search: Vec<UserSearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResult {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub provider_key: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<String>,
    pub last_login_at: Option<String>,
}

pub struct SearchUsers;

#[async_trait]
impl Tool for SearchUsers {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_search_users".to_string(),
            description: "Search for users by name or email. Returns matching user profiles for collaboration context.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "minLength": 1, "description": "Search query for user name or email." }
                },
                "required": ["query"],
                "additionalProperties": false
            }),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "search users"
    }

    async fn run(&self, ctx: &ToolContext, arguments: Value) -> Result<CallToolResult, ToolError> {
        let input: SearchUsersInput = decode(arguments)?;
        let data: SearchUsersData = ctx
            .graphql(SEARCH_USERS, json!({ "query": input.query }))
            .await?;
        Ok(json_result(&data.users.search))
    }
}

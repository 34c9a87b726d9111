//! Instance-level reads: system info, navigation and site configuration.

use super::Tool;
use crate::context::ToolContext;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wikijs_core::{CallToolResult, ToolError, json_result};

fn no_arguments() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

// ---------------------------------------------------------------------------
// wikijs_get_system_info
// ---------------------------------------------------------------------------

// Host names, file system paths and the SSL subscriber are never requested.
const GET_SYSTEM_INFO: &str = r#"
query GetSystemInfo {
  system {
    info {
      cpuCores
      currentVersion
      dbType
      dbVersion
      groupsTotal
      httpPort
      httpRedirection
      httpsPort
      latestVersion
      latestVersionReleaseDate
      nodeVersion
      operatingSystem
      pagesTotal
      platform
      ramTotal
      sslExpirationDate
      sslProvider
      sslStatus
      telemetry
      upgradeCapable
      usersTotal
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct SystemInfoData {
    system: SystemInfoSystem,
}

#[derive(Debug, Deserialize)]
struct SystemInfoSystem {
    info: SystemInfo,
}

/// Diagnostics safe to show an agent. Unlisted fields are dropped on decode.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub cpu_cores: Option<i64>,
    pub current_version: Option<String>,
    pub db_type: Option<String>,
    pub db_version: Option<String>,
    pub groups_total: Option<i64>,
    pub http_port: Option<i64>,
    pub http_redirection: Option<bool>,
    pub https_port: Option<i64>,
    pub latest_version: Option<String>,
    pub latest_version_release_date: Option<String>,
    pub node_version: Option<String>,
    pub operating_system: Option<String>,
    pub pages_total: Option<i64>,
    pub platform: Option<String>,
    pub ram_total: Option<String>,
    pub ssl_expiration_date: Option<String>,
    pub ssl_provider: Option<String>,
    pub ssl_status: Option<String>,
    pub telemetry: Option<bool>,
    pub upgrade_capable: Option<bool>,
    pub users_total: Option<i64>,
}

pub struct GetSystemInfo;

#[async_trait]
impl Tool for GetSystemInfo {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_system_info".to_string(),
            description: "Retrieve Wiki.js system information including version, database type, and usage statistics. \
                          Useful for diagnostics. Host names, file system paths and the database host are never returned."
                .to_string(),
            input_schema: no_arguments(),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get system info"
    }

    async fn run(&self, ctx: &ToolContext, _arguments: Value) -> Result<CallToolResult, ToolError> {
        let data: SystemInfoData = ctx.graphql(GET_SYSTEM_INFO, json!({})).await?;
        Ok(json_result(&data.system.info))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_navigation
// ---------------------------------------------------------------------------

const GET_NAVIGATION: &str = r#"
query GetNavigation {
  navigation {
    tree {
      locale
      items {
        id
        kind
        label
        icon
        targetType
        target
        visibilityMode
        visibilityGroups
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct NavigationData {
    navigation: NavigationRoot,
}

#[derive(Debug, Deserialize)]
struct NavigationRoot {
    #[serde(default)]
    tree: Vec<NavigationTree>,
}

/// Navigation items configured for one locale.
#[derive(Debug, Serialize, Deserialize)]
pub struct NavigationTree {
    pub locale: String,
    #[serde(default)]
    pub items: Vec<NavigationItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub id: String,
    /// `link`, `header` or `divider`.
    pub kind: String,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub target_type: Option<String>,
    pub target: Option<String>,
    pub visibility_mode: Option<String>,
    #[serde(default)]
    pub visibility_groups: Vec<i64>,
}

pub struct GetNavigation;

#[async_trait]
impl Tool for GetNavigation {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_navigation".to_string(),
            description: "Retrieve the navigation tree for all locales. Returns configured navigation items including links, headers, and dividers with their visibility settings.".to_string(),
            input_schema: no_arguments(),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get navigation"
    }

    async fn run(&self, ctx: &ToolContext, _arguments: Value) -> Result<CallToolResult, ToolError> {
        let data: NavigationData = ctx.graphql(GET_NAVIGATION, json!({})).await?;
        Ok(json_result(&data.navigation.tree))
    }
}

// ---------------------------------------------------------------------------
// wikijs_get_site_config
// ---------------------------------------------------------------------------

const GET_SITE_CONFIG: &str = r#"
query GetSiteConfig {
  site {
    config {
      host
      title
      description
      robots
      analyticsService
      analyticsId
      company
      contentLicense
      logoUrl
      featurePageRatings
      featurePageComments
      featurePersonalWikis
      authAutoLogin
      authEnforce2FA
      authHideLocal
      uploadMaxFileSize
      uploadMaxFiles
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct SiteConfigData {
    site: SiteConfigSite,
}

#[derive(Debug, Deserialize)]
struct SiteConfigSite {
    config: SiteConfig,
}

/// Public site settings. No secrets or authentication keys.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub host: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub robots: Vec<String>,
    pub analytics_service: Option<String>,
    pub analytics_id: Option<String>,
    pub company: Option<String>,
    pub content_license: Option<String>,
    pub logo_url: Option<String>,
    pub feature_page_ratings: Option<bool>,
    pub feature_page_comments: Option<bool>,
    pub feature_personal_wikis: Option<bool>,
    pub auth_auto_login: Option<bool>,
    #[serde(rename = "authEnforce2FA")]
    pub auth_enforce_2fa: Option<bool>,
    pub auth_hide_local: Option<bool>,
    pub upload_max_file_size: Option<i64>,
    pub upload_max_files: Option<i64>,
}

pub struct GetSiteConfig;

#[async_trait]
impl Tool for GetSiteConfig {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "wikijs_get_site_config".to_string(),
            description: "Retrieve safe (non-sensitive) site configuration including title, description, feature flags, and upload limits. Does not expose secrets or authentication keys.".to_string(),
            input_schema: no_arguments(),
            annotations: Some(ToolAnnotations::read_only()),
        }
    }

    fn context(&self) -> &'static str {
        "get site config"
    }

    async fn run(&self, ctx: &ToolContext, _arguments: Value) -> Result<CallToolResult, ToolError> {
        let data: SiteConfigData = ctx.graphql(GET_SITE_CONFIG, json!({})).await?;
        Ok(json_result(&data.site.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_info_drops_infrastructure_fields() {
        let info: SystemInfo = serde_json::from_value(json!({
            "currentVersion": "2.5.300",
            "dbType": "postgres",
            "dbHost": "db.internal",
            "hostname": "wiki-01",
            "configFile": "/wiki/config.yml",
            "workingDirectory": "/wiki",
            "sslSubscriberEmail": "ops@example.com",
            "telemetryClientId": "abc",
            "sslDomain": "wiki.example.com"
        }))
        .unwrap();

        let encoded = serde_json::to_string(&info).unwrap();
        assert!(encoded.contains("2.5.300"));
        for leaked in ["db.internal", "wiki-01", "config.yml", "/wiki", "ops@example.com", "abc", "wiki.example.com"] {
            assert!(!encoded.contains(leaked), "system info leaks {}", leaked);
        }
    }

    #[test]
    fn test_system_info_query_skips_infrastructure_fields() {
        for field in ["dbHost", "hostname", "configFile", "workingDirectory", "sslSubscriberEmail", "telemetryClientId", "sslDomain"] {
            assert!(!GET_SYSTEM_INFO.contains(field), "query requests {}", field);
        }
    }

    #[test]
    fn test_site_config_two_factor_field_name() {
        let config: SiteConfig =
            serde_json::from_value(json!({ "authEnforce2FA": true, "robots": ["index"] })).unwrap();
        assert_eq!(config.auth_enforce_2fa, Some(true));
        assert_eq!(serde_json::to_value(&config).unwrap()["authEnforce2FA"], true);
    }
}

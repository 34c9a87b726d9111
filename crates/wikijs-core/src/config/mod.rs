//! Configuration for the Wiki.js MCP server.
//!
//! Settings come from `WIKI_*` environment variables and are read exactly once at
//! startup. The resulting [`WikiConfig`] is immutable; at wiring time it is split
//! into parts so each component only receives what it needs (the API token goes to
//! the transport, the confirm token to the mutation gate).
//!
//! ## Variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `WIKI_BASE_URL` | required, http(s) |
//! | `WIKI_GRAPHQL_PATH` | `/graphql` |
//! | `WIKI_API_TOKEN` | required |
//! | `WIKI_DEFAULT_LOCALE` | `en` |
//! | `WIKI_DEFAULT_EDITOR` | `markdown` |
//! | `WIKI_MUTATIONS_ENABLED` | `false` |
//! | `WIKI_MUTATION_CONFIRM_TOKEN` | unset |
//! | `WIKI_MUTATION_DRY_RUN` | `true` |
//! | `WIKI_ALLOWED_MUTATION_PATH_PREFIXES` | empty (all paths) |
//! | `WIKI_HTTP_TIMEOUT_MS` | `15000` |
//! | `WIKI_HTTP_MAX_RETRIES` | `2` |
//! | `WIKI_AUDIT_LOG_FILE` | unset (stderr) |

pub mod http;
pub mod mutation;

pub use http::HttpConfig;
pub use mutation::MutationConfig;

use crate::path::normalize_wiki_path;
use secrecy::SecretString;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "WIKI_BASE_URL";
pub const ENV_GRAPHQL_PATH: &str = "WIKI_GRAPHQL_PATH";
pub const ENV_API_TOKEN: &str = "WIKI_API_TOKEN";
pub const ENV_DEFAULT_LOCALE: &str = "WIKI_DEFAULT_LOCALE";
pub const ENV_DEFAULT_EDITOR: &str = "WIKI_DEFAULT_EDITOR";
pub const ENV_MUTATIONS_ENABLED: &str = "WIKI_MUTATIONS_ENABLED";
pub const ENV_MUTATION_CONFIRM_TOKEN: &str = "WIKI_MUTATION_CONFIRM_TOKEN";
pub const ENV_MUTATION_DRY_RUN: &str = "WIKI_MUTATION_DRY_RUN";
pub const ENV_ALLOWED_PREFIXES: &str = "WIKI_ALLOWED_MUTATION_PATH_PREFIXES";
pub const ENV_HTTP_TIMEOUT_MS: &str = "WIKI_HTTP_TIMEOUT_MS";
pub const ENV_HTTP_MAX_RETRIES: &str = "WIKI_HTTP_MAX_RETRIES";
pub const ENV_AUDIT_LOG_FILE: &str = "WIKI_AUDIT_LOG_FILE";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where the GraphQL endpoint lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Path with a leading slash and no trailing slash.
    pub graphql_path: String,
}

impl Endpoint {
    /// Full GraphQL URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.graphql_path)
    }
}

/// Values applied when a tool call omits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDefaults {
    pub locale: String,
    pub editor: String,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            editor: "markdown".to_string(),
        }
    }
}

/// Secret values, kept apart from the rest of the configuration.
#[derive(Debug)]
pub struct Secrets {
    pub api_token: SecretString,
    pub confirm_token: Option<SecretString>,
}

/// Complete server configuration.
#[derive(Debug)]
pub struct WikiConfig {
    pub endpoint: Endpoint,
    pub defaults: PageDefaults,
    pub http: HttpConfig,
    pub mutation: MutationConfig,
    pub audit_log_file: Option<PathBuf>,
    pub secrets: Secrets,
}

impl WikiConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Whitespace-only values are treated as unset. Values are trimmed, except
    /// the confirm token, which is compared exactly as given.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let get_secret = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let base_url = parse_base_url(&get(ENV_BASE_URL).ok_or(ConfigError::Missing(ENV_BASE_URL))?)?;
        let graphql_path = normalize_graphql_path(
            get(ENV_GRAPHQL_PATH).as_deref().unwrap_or("/graphql"),
        );
        let api_token = get(ENV_API_TOKEN).ok_or(ConfigError::Missing(ENV_API_TOKEN))?;

        let defaults = PageDefaults {
            locale: get(ENV_DEFAULT_LOCALE).unwrap_or_else(|| "en".to_string()),
            editor: get(ENV_DEFAULT_EDITOR).unwrap_or_else(|| "markdown".to_string()),
        };

        let http = HttpConfig {
            timeout_ms: parse_int(get(ENV_HTTP_TIMEOUT_MS), http::DEFAULT_TIMEOUT_MS, 1),
            max_retries: parse_int(get(ENV_HTTP_MAX_RETRIES), http::DEFAULT_MAX_RETRIES, 0),
        };

        let confirm_token = get_secret(ENV_MUTATION_CONFIRM_TOKEN);
        let mutation = MutationConfig {
            enabled: get(ENV_MUTATIONS_ENABLED)
                .is_some_and(|value| value.eq_ignore_ascii_case("true")),
            dry_run: !get(ENV_MUTATION_DRY_RUN)
                .is_some_and(|value| value.eq_ignore_ascii_case("false")),
            allowed_path_prefixes: parse_prefixes(get(ENV_ALLOWED_PREFIXES).as_deref()),
        };

        if mutation.enabled && confirm_token.is_none() {
            tracing::warn!(
                "Mutations are enabled without {}; confirm tokens will not be checked",
                ENV_MUTATION_CONFIRM_TOKEN
            );
        }

        Ok(Self {
            endpoint: Endpoint {
                base_url,
                graphql_path,
            },
            defaults,
            http,
            mutation,
            audit_log_file: get(ENV_AUDIT_LOG_FILE).map(PathBuf::from),
            secrets: Secrets {
                api_token: SecretString::from(api_token),
                confirm_token: confirm_token.map(SecretString::from),
            },
        })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        name: ENV_BASE_URL,
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name: ENV_BASE_URL,
            reason: format!("unsupported scheme '{}', expected http or https", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ConfigError::Invalid {
            name: ENV_BASE_URL,
            reason: "missing host".to_string(),
        });
    }

    Ok(trimmed.to_string())
}

fn normalize_graphql_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn parse_int<T>(raw: Option<String>, default: T, min: T) -> T
where
    T: std::str::FromStr + PartialOrd + Copy,
{
    raw.and_then(|value| value.parse::<T>().ok())
        .filter(|value| *value >= min)
        .unwrap_or(default)
}

fn parse_prefixes(raw: Option<&str>) -> Vec<String> {
    raw.map(|csv| {
        csv.split(',')
            .map(normalize_wiki_path)
            .filter(|prefix| !prefix.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<WikiConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WikiConfig::from_lookup(|name| map.get(name).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_BASE_URL, "https://wiki.example.com/"),
            (ENV_API_TOKEN, "api-token-value"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&minimal()).unwrap();
        assert_eq!(config.endpoint.base_url, "https://wiki.example.com");
        assert_eq!(config.endpoint.url(), "https://wiki.example.com/graphql");
        assert_eq!(config.defaults, PageDefaults::default());
        assert_eq!(config.http.timeout_ms, 15000);
        assert_eq!(config.http.max_retries, 2);
        assert!(!config.mutation.enabled);
        assert!(config.mutation.dry_run);
        assert!(config.mutation.allowed_path_prefixes.is_empty());
        assert!(config.secrets.confirm_token.is_none());
        assert!(config.audit_log_file.is_none());
        assert_eq!(config.secrets.api_token.expose_secret(), "api-token-value");
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[(ENV_API_TOKEN, "t")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_BASE_URL)));

        let err = load(&[(ENV_BASE_URL, "https://wiki.example.com"), (ENV_API_TOKEN, "   ")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_API_TOKEN)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = load(&[(ENV_BASE_URL, "ftp://wiki.example.com"), (ENV_API_TOKEN, "t")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: ENV_BASE_URL, .. }));

        let err = load(&[(ENV_BASE_URL, "not a url"), (ENV_API_TOKEN, "t")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_graphql_path_normalized() {
        let mut vars = minimal();
        vars.push((ENV_GRAPHQL_PATH, " api/graphql// "));
        let config = load(&vars).unwrap();
        assert_eq!(config.endpoint.graphql_path, "/api/graphql");
    }

    #[test]
    fn test_mutation_flags_and_prefixes() {
        let mut vars = minimal();
        vars.extend([
            (ENV_MUTATIONS_ENABLED, "TRUE"),
            (ENV_MUTATION_DRY_RUN, "False"),
            (ENV_MUTATION_CONFIRM_TOKEN, "s3cret"),
            (ENV_ALLOWED_PREFIXES, " /docs/ , ,guides,, /"),
        ]);
        let config = load(&vars).unwrap();
        assert!(config.mutation.enabled);
        assert!(!config.mutation.dry_run);
        assert_eq!(config.mutation.allowed_path_prefixes, vec!["docs", "guides"]);
        assert_eq!(
            config.secrets.confirm_token.as_ref().map(|t| t.expose_secret()),
            Some("s3cret")
        );
    }

    #[test]
    fn test_confirm_token_kept_verbatim() {
        let mut vars = minimal();
        vars.push((ENV_MUTATION_CONFIRM_TOKEN, " abc "));
        let config = load(&vars).unwrap();
        assert_eq!(
            config.secrets.confirm_token.as_ref().map(|t| t.expose_secret()),
            Some(" abc ")
        );

        let mut vars = minimal();
        vars.push((ENV_MUTATION_CONFIRM_TOKEN, "   "));
        assert!(load(&vars).unwrap().secrets.confirm_token.is_none());
    }

    #[test]
    fn test_dry_run_stays_on_unless_false() {
        let mut vars = minimal();
        vars.push((ENV_MUTATION_DRY_RUN, "nope"));
        assert!(load(&vars).unwrap().mutation.dry_run);
    }

    #[test]
    fn test_int_fallbacks() {
        let mut vars = minimal();
        vars.extend([(ENV_HTTP_TIMEOUT_MS, "0"), (ENV_HTTP_MAX_RETRIES, "abc")]);
        let config = load(&vars).unwrap();
        assert_eq!(config.http.timeout_ms, 15000);
        assert_eq!(config.http.max_retries, 2);

        let mut vars = minimal();
        vars.extend([(ENV_HTTP_TIMEOUT_MS, "2500"), (ENV_HTTP_MAX_RETRIES, "0")]);
        let config = load(&vars).unwrap();
        assert_eq!(config.http.timeout_ms, 2500);
        assert_eq!(config.http.max_retries, 0);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut vars = minimal();
        vars.push((ENV_MUTATION_CONFIRM_TOKEN, "confirm-value"));
        let config = load(&vars).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("api-token-value"));
        assert!(!debug.contains("confirm-value"));
    }
}

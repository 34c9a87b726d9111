//! `wikijs-mcp check-config`: validate the environment without starting the server.

use anyhow::{Context, Result};
use wikijs_audit::REDACTED;
use wikijs_core::WikiConfig;

pub fn run() -> Result<()> {
    let config = WikiConfig::from_env().context("configuration is invalid")?;
    print!("{}", summary(&config));
    Ok(())
}

fn summary(config: &WikiConfig) -> String {
    let prefixes = if config.mutation.allowed_path_prefixes.is_empty() {
        "(all paths)".to_string()
    } else {
        config.mutation.allowed_path_prefixes.join(", ")
    };
    let confirm = if config.secrets.confirm_token.is_some() {
        REDACTED
    } else {
        "(not set)"
    };
    let audit = config
        .audit_log_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(stderr)".to_string());

    let mut out = String::new();
    out.push_str("Configuration OK\n\n");
    out.push_str(&format!("  GraphQL endpoint:   {}\n", config.endpoint.url()));
    out.push_str(&format!("  API token:          {}\n", REDACTED));
    out.push_str(&format!("  Default locale:     {}\n", config.defaults.locale));
    out.push_str(&format!("  Default editor:     {}\n", config.defaults.editor));
    out.push_str(&format!("  HTTP timeout:       {} ms\n", config.http.timeout_ms));
    out.push_str(&format!("  HTTP max retries:   {}\n", config.http.max_retries));
    out.push_str(&format!("  Mutations enabled:  {}\n", config.mutation.enabled));
    out.push_str(&format!("  Dry run:            {}\n", config.mutation.dry_run));
    out.push_str(&format!("  Confirm token:      {}\n", confirm));
    out.push_str(&format!("  Allowed prefixes:   {}\n", prefixes));
    out.push_str(&format!("  Audit log:          {}\n", audit));
    out
}

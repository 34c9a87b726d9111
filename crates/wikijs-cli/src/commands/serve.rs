//! `wikijs-mcp serve`: wire the components together and run over stdio.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use wikijs_audit::AuditLogger;
use wikijs_core::WikiConfig;
use wikijs_graphql::GraphqlClient;
use wikijs_mcp::{McpServer, ToolContext, default_registry};
use wikijs_policy::MutationGate;

pub async fn run() -> Result<()> {
    let config = WikiConfig::from_env().context("failed to load configuration")?;
    let WikiConfig {
        endpoint,
        defaults,
        http,
        mutation,
        audit_log_file,
        secrets,
    } = config;

    let transport = GraphqlClient::new(endpoint.url(), secrets.api_token, http)
        .context("failed to build GraphQL client")?;
    let gate = MutationGate::new(&mutation, secrets.confirm_token);
    let audit = AuditLogger::from_config(audit_log_file.as_deref())
        .context("failed to open audit log")?;

    info!(
        endpoint = %endpoint.url(),
        mutations_enabled = mutation.enabled,
        dry_run = mutation.dry_run,
        allowed_prefixes = mutation.allowed_path_prefixes.len(),
        "Configuration loaded"
    );

    let ctx = ToolContext::new(Arc::new(transport), Arc::new(gate), audit, defaults);
    let server = McpServer::new(default_registry()?, ctx);

    tokio::select! {
        result = server.run_stdio() => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted; shutting down"),
    }

    Ok(())
}

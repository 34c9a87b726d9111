//! Shared state handed to every tool call.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use wikijs_audit::AuditLogger;
use wikijs_core::{PageDefaults, WikiError};
use wikijs_graphql::{GraphqlTransport, RequestOptions, execute};
use wikijs_policy::MutationGate;

/// Everything a tool needs: the transport, the mutation gate, the audit
/// logger and the non-secret page defaults.
#[derive(Clone)]
pub struct ToolContext {
    transport: Arc<dyn GraphqlTransport>,
    gate: Arc<MutationGate>,
    audit: AuditLogger,
    defaults: PageDefaults,
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("gate", &self.gate)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ToolContext {
    pub fn new(
        transport: Arc<dyn GraphqlTransport>,
        gate: Arc<MutationGate>,
        audit: AuditLogger,
        defaults: PageDefaults,
    ) -> Self {
        Self {
            transport,
            gate,
            audit,
            defaults,
        }
    }

    pub fn gate(&self) -> &MutationGate {
        &self.gate
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn defaults(&self) -> &PageDefaults {
        &self.defaults
    }

    /// `locale` or the configured default.
    pub fn locale_or_default(&self, locale: Option<&str>) -> String {
        locale.unwrap_or(&self.defaults.locale).to_string()
    }

    /// Run a read and decode its data into `T`. Uses the configured retry budget.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, WikiError> {
        execute(self.transport.as_ref(), query, variables, RequestOptions::default()).await
    }

    /// Run a remote mutation. Never retried.
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, WikiError> {
        execute(self.transport.as_ref(), query, variables, RequestOptions::no_retry()).await
    }
}

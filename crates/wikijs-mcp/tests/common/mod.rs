//! Shared fixtures: an in-memory transport and a ready tool context.

#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wikijs_audit::{AuditLogger, MemorySink};
use wikijs_core::{CallToolResult, MutationConfig, PageDefaults, WikiError};
use wikijs_graphql::{GraphqlTransport, RequestOptions};
use wikijs_mcp::{ToolContext, ToolRegistry, default_registry};
use wikijs_policy::MutationGate;

pub const CONFIRM: &str = "let-me-write";

type Responder = dyn Fn(&str, &Value) -> Result<Value, WikiError> + Send + Sync;

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub variables: Value,
    pub options: RequestOptions,
}

/// Transport that answers from a closure keyed by operation name and records
/// every call.
pub struct FakeTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responder: Box<Responder>,
}

impl FakeTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, WikiError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.operation).collect()
    }
}

#[async_trait]
impl GraphqlTransport for FakeTransport {
    async fn execute_raw(
        &self,
        query: &str,
        variables: Value,
        options: RequestOptions,
    ) -> Result<Value, WikiError> {
        let operation = operation_name(query);
        let response = (self.responder)(&operation, &variables);
        self.calls.lock().unwrap().push(RecordedCall {
            operation,
            variables,
            options,
        });
        response
    }
}

/// `GetPagePath` from `query GetPagePath($id: Int!) {...}`.
pub fn operation_name(query: &str) -> String {
    query
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .split(['(', '{'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// `data` for the page path lookup.
pub fn page_path(path: &str) -> Value {
    json!({ "pages": { "single": { "path": path } } })
}

/// A successful `responseResult`.
pub fn ok_result() -> Value {
    json!({ "succeeded": true, "errorCode": 0, "slug": "ok", "message": "Done" })
}

pub fn mutations(enabled: bool, dry_run: bool, prefixes: &[&str]) -> MutationConfig {
    MutationConfig {
        enabled,
        dry_run,
        allowed_path_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
    }
}

pub struct Harness {
    pub ctx: ToolContext,
    pub transport: Arc<FakeTransport>,
    pub audit: Arc<MemorySink>,
    pub registry: ToolRegistry,
}

impl Harness {
    /// A context with the confirm token set to [`CONFIRM`].
    pub fn new<F>(mutation: MutationConfig, responder: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, WikiError> + Send + Sync + 'static,
    {
        Self::with_token(mutation, Some(CONFIRM), responder)
    }

    pub fn with_token<F>(mutation: MutationConfig, token: Option<&str>, responder: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, WikiError> + Send + Sync + 'static,
    {
        let transport = Arc::new(FakeTransport::new(responder));
        let audit = Arc::new(MemorySink::new());
        let gate = MutationGate::new(&mutation, token.map(|t| SecretString::from(t.to_string())));
        let ctx = ToolContext::new(
            transport.clone(),
            Arc::new(gate),
            AuditLogger::new(audit.clone()),
            PageDefaults::default(),
        );
        Self {
            ctx,
            transport,
            audit,
            registry: default_registry().unwrap(),
        }
    }

    pub async fn call(&self, tool: &str, arguments: Value) -> CallToolResult {
        self.registry.call(&self.ctx, tool, arguments).await
    }

    /// Audit records as JSON, without the line prefix.
    pub fn audit_records(&self) -> Vec<Value> {
        self.audit
            .lines()
            .iter()
            .map(|line| {
                let json = line.split_once(" mutation_audit ").unwrap().1;
                serde_json::from_str(json).unwrap()
            })
            .collect()
    }
}

pub fn unexpected(operation: &str) -> Result<Value, WikiError> {
    Err(WikiError::generic(format!("unexpected operation {}", operation)))
}

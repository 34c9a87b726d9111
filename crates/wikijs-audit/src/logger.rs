//! Audit logger implementation.
//!
//! [`AuditLogger::record`] is the only entry point tool code uses. It redacts,
//! serializes and writes one line, and never fails the calling operation.

use crate::error::AuditError;
use crate::event::MutationAuditRecord;
use crate::redact::redact;
use crate::sink::{AuditSink, FileSink, StderrSink};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// The mutation audit logger.
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for AuditLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLogger").finish_non_exhaustive()
    }
}

impl AuditLogger {
    /// Create a logger writing to a custom sink.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Create a logger writing to stderr.
    pub fn stderr() -> Self {
        Self::new(Arc::new(StderrSink))
    }

    /// Append to `path` when given, otherwise write to stderr.
    pub fn from_config(path: Option<&Path>) -> Result<Self, AuditError> {
        match path {
            Some(path) => {
                let sink = FileSink::open(path)?;
                tracing::info!(path = %path.display(), "Audit log file opened");
                Ok(Self::new(Arc::new(sink)))
            }
            None => Ok(Self::stderr()),
        }
    }

    /// Record one mutation attempt.
    ///
    /// Sensitive keys in `details` are redacted at any depth. Write failures are
    /// logged and swallowed.
    pub fn record(&self, operation: &str, details: &Value) {
        tracing::info!(operation, "Mutation audited");

        if let Err(e) = self.try_record(operation, details) {
            tracing::warn!(operation, error = %e, "Failed to write audit record");
        }
    }

    fn try_record(&self, operation: &str, details: &Value) -> Result<(), AuditError> {
        let record = MutationAuditRecord::new(operation, redact(details));
        let line = record.to_log_line()?;
        self.sink.write_line(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use serde_json::json;

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn write_line(&self, _line: &str) -> Result<(), AuditError> {
            Err(AuditError::Poisoned)
        }
    }

    #[test]
    fn test_record_redacts_secrets() {
        let sink = Arc::new(MemorySink::new());
        let logger = AuditLogger::new(sink.clone());

        logger.record(
            "create",
            &json!({
                "path": "docs/new",
                "confirm": "confirm-token-value",
                "nested": [{ "apiToken": "api-token-value" }]
            }),
        );

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[wikijs-mcp] mutation_audit "));
        assert!(lines[0].contains("\"operation\":\"create\""));
        assert!(lines[0].contains("docs/new"));
        assert!(!lines[0].contains("confirm-token-value"));
        assert!(!lines[0].contains("api-token-value"));
    }

    #[test]
    fn test_record_never_fails() {
        let logger = AuditLogger::new(Arc::new(FailingSink));
        logger.record("delete", &json!({ "id": 1 }));
    }

    #[test]
    fn test_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let logger = AuditLogger::from_config(Some(&path)).unwrap();
        logger.record("deleteTag", &json!({ "id": 9, "token": "hidden" }));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("deleteTag"));
        assert!(!content.contains("hidden"));
        assert!(content.ends_with('\n'));
    }
}

//! The audit record written for every mutation attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed source identifier stamped on every record.
pub const AUDIT_SOURCE: &str = "wikijs-mcp";

/// One mutation attempt: dry-run, success, remote failure or thrown error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationAuditRecord {
    /// When the record was created.
    pub ts: DateTime<Utc>,

    /// Always [`AUDIT_SOURCE`].
    pub source: String,

    /// Operation name (`create`, `update`, `deleteTag`, `create_comment`, ...).
    pub operation: String,

    /// Sanitized details. Callers pass already-redacted values.
    pub details: Value,
}

impl MutationAuditRecord {
    /// Create a record stamped with the current time.
    pub fn new(operation: impl Into<String>, details: Value) -> Self {
        Self {
            ts: Utc::now(),
            source: AUDIT_SOURCE.to_string(),
            operation: operation.into(),
            details,
        }
    }

    /// Render as one log line: `[wikijs-mcp] mutation_audit {json}`.
    pub fn to_log_line(&self) -> Result<String, serde_json::Error> {
        Ok(format!(
            "[{}] mutation_audit {}",
            AUDIT_SOURCE,
            serde_json::to_string(self)?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_line_format() {
        let record = MutationAuditRecord::new("delete", json!({ "id": 3, "path": "docs/old" }));
        let line = record.to_log_line().unwrap();
        assert!(line.starts_with("[wikijs-mcp] mutation_audit {"));
        assert!(!line.contains('\n'));

        let json_part = line.trim_start_matches("[wikijs-mcp] mutation_audit ");
        let parsed: MutationAuditRecord = serde_json::from_str(json_part).unwrap();
        assert_eq!(parsed.operation, "delete");
        assert_eq!(parsed.source, AUDIT_SOURCE);
        assert_eq!(parsed.details["id"], 3);
    }
}

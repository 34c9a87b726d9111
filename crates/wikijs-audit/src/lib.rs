//! # wikijs-audit
//!
//! Audit logging for Wiki.js mutations.
//!
//! Every mutation attempt (dry-run, success, remote failure or thrown error)
//! produces exactly one record. Records go to an operational stream, never to
//! the tool's return value.
//!
//! ## Record format
//!
//! One line per record:
//!
//! ```text
//! [wikijs-mcp] mutation_audit {"ts":"...","source":"wikijs-mcp","operation":"create","details":{...}}
//! ```
//!
//! Secret-bearing keys in `details` are replaced with `[REDACTED]` at any depth,
//! through nested objects and arrays.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wikijs_audit::AuditLogger;
//! use serde_json::json;
//!
//! let audit = AuditLogger::stderr();
//! audit.record("create", &json!({ "path": "docs/new", "confirm": "s3cret" }));
//! ```

pub mod error;
pub mod event;
pub mod logger;
pub mod redact;
pub mod sink;

pub use error::AuditError;
pub use event::{AUDIT_SOURCE, MutationAuditRecord};
pub use logger::AuditLogger;
pub use redact::{REDACTED, is_sensitive_key, redact};
pub use sink::{AuditSink, FileSink, MemorySink, StderrSink};

//! The transport seam tool code depends on.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use wikijs_core::WikiError;

/// Per-call transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Overrides the configured timeout.
    pub timeout_ms: Option<u64>,
    /// Forces zero retries. Write operations always set this.
    pub no_retry: bool,
    /// Correlation id; generated when absent.
    pub request_id: Option<String>,
}

impl RequestOptions {
    /// Options for a remote mutation: never retried.
    pub fn no_retry() -> Self {
        Self {
            no_retry: true,
            ..Self::default()
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Executes GraphQL documents against Wiki.js.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    /// Execute a document and return its `data` object.
    async fn execute_raw(
        &self,
        query: &str,
        variables: Value,
        options: RequestOptions,
    ) -> Result<Value, WikiError>;
}

/// Execute a document and decode its `data` into `T`.
pub async fn execute<T: DeserializeOwned>(
    transport: &dyn GraphqlTransport,
    query: &str,
    variables: Value,
    options: RequestOptions,
) -> Result<T, WikiError> {
    let data = transport.execute_raw(query, variables, options).await?;
    decode_data(data)
}

/// Decode a `data` object; shape mismatches are `Generic` errors.
pub fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T, WikiError> {
    serde_json::from_value(data).map_err(|e| {
        WikiError::generic(format!("Unexpected response shape from Wiki.js: {}", e))
    })
}

/// Whether a document is a mutation, judged by its leading keyword.
pub fn is_mutation(query: &str) -> bool {
    query
        .trim_start()
        .strip_prefix("mutation")
        .is_some_and(|rest| {
            !rest
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wikijs_core::ErrorKind;

    #[test]
    fn test_is_mutation() {
        assert!(is_mutation("mutation CreatePage($x: Int) { pages { create } }"));
        assert!(is_mutation("\n   mutation{ pages { delete(id: 1) } }"));
        assert!(is_mutation("mutation"));
        assert!(!is_mutation("query GetPage { pages { single(id: 1) { id } } }"));
        assert!(!is_mutation("{ pages { list { id } } }"));
        assert!(!is_mutation("mutations { x }"));
        assert!(!is_mutation("query Q { mutation }"));
    }

    #[test]
    fn test_no_retry_options() {
        let options = RequestOptions::no_retry().with_request_id("req_1");
        assert!(options.no_retry);
        assert_eq!(options.request_id.as_deref(), Some("req_1"));
        assert!(options.timeout_ms.is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Pages {
        pages: Vec<u32>,
    }

    #[test]
    fn test_decode_shape_mismatch_is_generic() {
        let err = decode_data::<Pages>(json!({"pages": "nope"})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Generic);
        assert!(err.message.contains("Unexpected response shape"));

        let ok = decode_data::<Pages>(json!({"pages": [1, 2]})).unwrap();
        assert_eq!(ok.pages, vec![1, 2]);
    }
}

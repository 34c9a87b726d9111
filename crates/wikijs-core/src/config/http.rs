//! HTTP transport settings.

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Timeout and retry budget for GraphQL requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request time bound in milliseconds (at least 1).
    pub timeout_ms: u64,
    /// Retries after the first attempt for read queries.
    pub max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

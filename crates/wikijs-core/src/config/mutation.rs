//! Mutation policy settings.

/// Non-secret mutation policy. The confirm token itself lives in [`super::Secrets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationConfig {
    /// Write tools are refused unless this is set.
    pub enabled: bool,
    /// Write tools return a preview instead of calling the remote mutation.
    pub dry_run: bool,
    /// Normalized path prefixes writes are confined to. Empty allows every path.
    pub allowed_path_prefixes: Vec<String>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dry_run: true,
            allowed_path_prefixes: Vec::new(),
        }
    }
}

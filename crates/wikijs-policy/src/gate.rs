//! The mutation safety gate.

use crate::scope::PathScope;
use crate::token::tokens_match;
use secrecy::{ExposeSecret, SecretString};
use wikijs_core::{MutationConfig, WikiError};

/// Decides whether a write may proceed.
///
/// Built once from the frozen configuration; holds the only copy of the confirm token.
#[derive(Debug)]
pub struct MutationGate {
    enabled: bool,
    dry_run: bool,
    confirm_token: Option<SecretString>,
    scope: PathScope,
}

impl MutationGate {
    /// Create a gate. An empty confirm token counts as not configured.
    pub fn new(config: &MutationConfig, confirm_token: Option<SecretString>) -> Self {
        let confirm_token = confirm_token.filter(|token| !token.expose_secret().is_empty());
        Self {
            enabled: config.enabled,
            dry_run: config.dry_run,
            confirm_token,
            scope: PathScope::new(&config.allowed_path_prefixes),
        }
    }

    /// Whether writes return a preview instead of calling the remote mutation.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Fail with `MutationDisabled` unless writes are switched on.
    pub fn enforce_mutation_enabled(&self) -> Result<(), WikiError> {
        if self.enabled {
            Ok(())
        } else {
            tracing::info!("Mutation refused: mutations are disabled");
            Err(WikiError::mutation_disabled())
        }
    }

    /// Fail with `InvalidToken` if a confirm token is configured and `supplied` differs.
    ///
    /// Without a configured token the check is skipped.
    pub fn enforce_confirm_token(&self, supplied: &str) -> Result<(), WikiError> {
        let Some(expected) = &self.confirm_token else {
            return Ok(());
        };
        if tokens_match(expected.expose_secret().as_bytes(), supplied.as_bytes()) {
            Ok(())
        } else {
            tracing::warn!("Mutation refused: confirm token mismatch");
            Err(WikiError::invalid_token())
        }
    }

    /// Enablement first, then the confirm token.
    pub fn enforce_mutation_safety(&self, supplied: &str) -> Result<(), WikiError> {
        self.enforce_mutation_enabled()?;
        self.enforce_confirm_token(supplied)
    }

    /// Fail with `PathNotAllowed` unless `path` is inside the allowed prefixes.
    pub fn enforce_path_allowed(&self, path: &str) -> Result<(), WikiError> {
        self.scope.check(path).inspect_err(|err| {
            tracing::warn!(error = %err, "Mutation refused: path outside allowed prefixes");
        })
    }
}

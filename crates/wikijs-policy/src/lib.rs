//! # wikijs-policy
//!
//! The mutation safety gate: the single choke point every write tool passes
//! before it may reach the remote API.
//!
//! Checks, in the order write tools apply them:
//!
//! 1. [`MutationGate::enforce_mutation_enabled`] - writes are switched on
//! 2. [`MutationGate::enforce_confirm_token`] - the caller echoed the confirm token
//! 3. [`MutationGate::enforce_path_allowed`] - the target path is inside an allowed prefix
//!
//! All three are local and fail before any network call.

pub mod gate;
pub mod scope;
pub mod token;

pub use gate::MutationGate;
pub use scope::PathScope;
pub use token::tokens_match;

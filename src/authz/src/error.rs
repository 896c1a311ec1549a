//! Error types for the authorization engine

use thiserror::Error;

/// Authorization engine errors
///
/// Per-request conditions (unauthenticated caller, unrecognized claims,
/// missing grants) are never errors; they resolve to deny decisions.
/// The variants here cover the two genuinely exceptional cases: a broken
/// policy set at start-up and a call site asking for a policy name that
/// was never generated.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Policy name not present in the generated registry
    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    /// Two policies registered under the same name
    #[error("Duplicate policy: {0}")]
    DuplicatePolicy(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

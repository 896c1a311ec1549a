//! Caller identity as consumed by the authorization engine
//!
//! Authentication happens upstream (gateway / session layer); by the
//! time an `Identity` reaches this crate its claims are already
//! validated strings. The engine only reads them.

use serde::{Deserialize, Serialize};

/// An authenticated (or explicitly anonymous) caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable caller identifier (user id, service account id)
    pub subject: String,
    /// Human-readable name for decision records
    pub display_name: String,
    /// Whether the upstream authenticator vouched for this caller
    pub authenticated: bool,
    /// Role claim strings in the order the identity provider issued them
    pub role_claims: Vec<String>,
}

impl Identity {
    /// Create an authenticated identity with no role claims yet
    pub fn new<S: Into<String>, D: Into<String>>(subject: S, display_name: D) -> Self {
        Identity {
            subject: subject.into(),
            display_name: display_name.into(),
            authenticated: true,
            role_claims: Vec::new(),
        }
    }

    /// Create an unauthenticated caller
    pub fn anonymous() -> Self {
        Identity {
            subject: "anonymous".to_string(),
            display_name: "Anonymous".to_string(),
            authenticated: false,
            role_claims: Vec::new(),
        }
    }

    /// Append a single role claim
    pub fn with_claim<S: Into<String>>(mut self, claim: S) -> Self {
        self.role_claims.push(claim.into());
        self
    }

    /// Replace the role claims wholesale, preserving the given order
    pub fn with_claims<I, S>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_claims = claims.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for Identity {
    fn default() -> Self {
        Identity::anonymous()
    }
}

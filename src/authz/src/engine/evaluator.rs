//! Requirement evaluation against caller claims
//!
//! Evaluation is pure, synchronous, and reentrant: all working state
//! lives on the stack of one call, the matrix is only ever read, and
//! the single external effect is the one decision record emitted per
//! evaluation through the sink.

use std::sync::Arc;

use haven_core::{Identity, Role};
use tracing::debug;

use crate::matrix::PermissionMatrix;
use crate::requirement::Requirement;

use super::audit::{DecisionSink, TracingSink};
use super::decision::{Decision, DecisionReason, DecisionRecord};

/// Executes requirements for callers and logs every outcome
pub struct Evaluator {
    matrix: Arc<PermissionMatrix>,
    sink: Arc<dyn DecisionSink>,
}

impl Evaluator {
    /// Create an evaluator logging through the default tracing sink
    pub fn new(matrix: Arc<PermissionMatrix>) -> Self {
        Self::with_sink(matrix, Arc::new(TracingSink))
    }

    /// Create an evaluator with an explicit decision sink
    pub fn with_sink(matrix: Arc<PermissionMatrix>, sink: Arc<dyn DecisionSink>) -> Self {
        Self { matrix, sink }
    }

    /// Evaluate `requirement` for `identity`
    ///
    /// Roles are tried in the order the claims were presented and the
    /// first satisfying role wins: holding additional roles can add
    /// permissions but never revoke them. Emits exactly one decision
    /// record.
    pub fn evaluate(&self, requirement: &Requirement, identity: &Identity) -> Decision {
        let decision = self.decide(requirement, identity);
        self.sink.record(&DecisionRecord::from(&decision));
        decision
    }

    fn decide(&self, requirement: &Requirement, identity: &Identity) -> Decision {
        if !identity.authenticated {
            // Anonymous callers never reach the matrix.
            return Decision::deny(
                requirement.clone(),
                identity,
                DecisionReason::Unauthenticated,
            );
        }

        if identity.role_claims.is_empty() {
            return Decision::deny(requirement.clone(), identity, DecisionReason::NoRoleClaims);
        }

        let mut roles: Vec<Role> = Vec::with_capacity(identity.role_claims.len());
        for claim in &identity.role_claims {
            match claim.parse::<Role>() {
                Ok(role) => roles.push(role),
                Err(_) => {
                    debug!(
                        subject = %identity.subject,
                        claim = %claim,
                        "Skipping unrecognized role claim"
                    );
                }
            }
        }

        if roles.is_empty() {
            return Decision::deny(
                requirement.clone(),
                identity,
                DecisionReason::NoRecognizedRoles,
            );
        }

        for role in roles {
            if requirement.satisfied_by(role, &self.matrix) {
                return Decision::grant(requirement.clone(), identity, role);
            }
        }

        Decision::deny(requirement.clone(), identity, DecisionReason::NotPermitted)
    }
}

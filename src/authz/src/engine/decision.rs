//! Decision types produced by the evaluator

use chrono::{DateTime, Utc};
use haven_core::{Identity, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::requirement::Requirement;

/// Why a decision came out the way it did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DecisionReason {
    /// A held role satisfied the requirement
    RoleGrant { role: Role },

    /// The caller was not authenticated
    Unauthenticated,

    /// The caller presented no role claims at all
    NoRoleClaims,

    /// Every presented claim failed to parse as a known role
    NoRecognizedRoles,

    /// Recognized roles were held, but none satisfied the requirement
    NotPermitted,
}

impl DecisionReason {
    /// Short stable label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            DecisionReason::RoleGrant { .. } => "role_grant",
            DecisionReason::Unauthenticated => "unauthenticated",
            DecisionReason::NoRoleClaims => "no_role_claims",
            DecisionReason::NoRecognizedRoles => "no_recognized_roles",
            DecisionReason::NotPermitted => "not_permitted",
        }
    }
}

/// The outcome of evaluating one requirement for one caller
///
/// Decisions are created per request and discarded; nothing caches or
/// replays them. What persists is the [`DecisionRecord`] projection
/// written to the decision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// Unique decision ID
    pub id: String,

    /// Whether access was granted
    pub granted: bool,

    /// The requirement that was evaluated
    pub requirement: Requirement,

    /// Caller subject identifier
    pub subject: String,

    /// Caller display name for the audit trail
    pub display_name: String,

    /// Why the decision came out this way
    pub reason: DecisionReason,

    /// Role claims the caller presented, recorded on denial
    pub attempted_claims: Vec<String>,

    /// Decision timestamp (milliseconds since epoch)
    pub timestamp: u64,
}

impl Decision {
    /// Create a granted decision for the role that satisfied the requirement
    pub fn grant(requirement: Requirement, identity: &Identity, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            granted: true,
            requirement,
            subject: identity.subject.clone(),
            display_name: identity.display_name.clone(),
            reason: DecisionReason::RoleGrant { role },
            attempted_claims: Vec::new(),
            timestamp: now_millis(),
        }
    }

    /// Create a denied decision, capturing the claims that were tried
    pub fn deny(requirement: Requirement, identity: &Identity, reason: DecisionReason) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            granted: false,
            requirement,
            subject: identity.subject.clone(),
            display_name: identity.display_name.clone(),
            reason,
            attempted_claims: identity.role_claims.clone(),
            timestamp: now_millis(),
        }
    }

    /// The role that granted access, if any
    pub fn granted_by(&self) -> Option<Role> {
        match &self.reason {
            DecisionReason::RoleGrant { role } => Some(*role),
            _ => None,
        }
    }
}

/// Serializable projection of a [`Decision`] written to decision sinks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub decision_id: String,
    pub granted: bool,
    /// Human-readable requirement description
    pub requirement: String,
    pub subject: String,
    pub display_name: String,
    pub reason: DecisionReason,
    pub attempted_claims: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<&Decision> for DecisionRecord {
    fn from(decision: &Decision) -> Self {
        Self {
            decision_id: decision.id.clone(),
            granted: decision.granted,
            requirement: decision.requirement.describe(),
            subject: decision.subject.clone(),
            display_name: decision.display_name.clone(),
            reason: decision.reason.clone(),
            attempted_claims: decision.attempted_claims.clone(),
            timestamp: DateTime::from_timestamp_millis(decision.timestamp as i64)
                .unwrap_or_else(Utc::now),
        }
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

//! Prometheus metrics collection for engine observability
//!
//! Evaluation is synchronous, so the counters are plain relaxed
//! atomics; nothing here takes a lock or awaits.

use std::sync::atomic::{AtomicU64, Ordering};

use super::decision::{Decision, DecisionReason};

/// Engine counters snapshot
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Total number of evaluations
    pub evaluations_total: u64,

    /// Granted decisions
    pub granted_total: u64,

    /// Denied decisions (all reasons)
    pub denied_total: u64,

    /// Denials because the caller was unauthenticated
    pub denied_unauthenticated: u64,

    /// Denials because no presented claim parsed to a role
    pub denied_no_usable_roles: u64,

    /// Denials because no held role satisfied the requirement
    pub denied_not_permitted: u64,

    /// Evaluation attempts against policy names that were never generated
    pub unknown_policy_total: u64,
}

impl EngineMetrics {
    /// Share of evaluations that granted access
    pub fn grant_rate(&self) -> f64 {
        if self.evaluations_total == 0 {
            0.0
        } else {
            self.granted_total as f64 / self.evaluations_total as f64
        }
    }
}

/// Lock-free metrics collector
#[derive(Debug, Default)]
pub struct MetricsCollector {
    evaluations: AtomicU64,
    granted: AtomicU64,
    denied_unauthenticated: AtomicU64,
    denied_no_usable_roles: AtomicU64,
    denied_not_permitted: AtomicU64,
    unknown_policy: AtomicU64,
}

impl MetricsCollector {
    /// Create a collector with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished decision into the counters
    pub fn record_decision(&self, decision: &Decision) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        match &decision.reason {
            DecisionReason::RoleGrant { .. } => {
                self.granted.fetch_add(1, Ordering::Relaxed);
            }
            DecisionReason::Unauthenticated => {
                self.denied_unauthenticated.fetch_add(1, Ordering::Relaxed);
            }
            DecisionReason::NoRoleClaims | DecisionReason::NoRecognizedRoles => {
                self.denied_no_usable_roles.fetch_add(1, Ordering::Relaxed);
            }
            DecisionReason::NotPermitted => {
                self.denied_not_permitted.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Count an evaluation request for an unregistered policy name
    pub fn record_unknown_policy(&self) {
        self.unknown_policy.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> EngineMetrics {
        let denied_unauthenticated = self.denied_unauthenticated.load(Ordering::Relaxed);
        let denied_no_usable_roles = self.denied_no_usable_roles.load(Ordering::Relaxed);
        let denied_not_permitted = self.denied_not_permitted.load(Ordering::Relaxed);

        EngineMetrics {
            evaluations_total: self.evaluations.load(Ordering::Relaxed),
            granted_total: self.granted.load(Ordering::Relaxed),
            denied_total: denied_unauthenticated + denied_no_usable_roles + denied_not_permitted,
            denied_unauthenticated,
            denied_no_usable_roles,
            denied_not_permitted,
            unknown_policy_total: self.unknown_policy.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
        self.granted.store(0, Ordering::Relaxed);
        self.denied_unauthenticated.store(0, Ordering::Relaxed);
        self.denied_no_usable_roles.store(0, Ordering::Relaxed);
        self.denied_not_permitted.store(0, Ordering::Relaxed);
        self.unknown_policy.store(0, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let metrics = self.snapshot();

        format!(
            r#"# HELP authz_evaluations_total Total number of evaluations
# TYPE authz_evaluations_total counter
authz_evaluations_total {}

# HELP authz_granted_total Granted decisions
# TYPE authz_granted_total counter
authz_granted_total {}

# HELP authz_denied_total Denied decisions
# TYPE authz_denied_total counter
authz_denied_total {}

# HELP authz_denied_reason_total Denied decisions by reason
# TYPE authz_denied_reason_total counter
authz_denied_reason_total{{reason="unauthenticated"}} {}
authz_denied_reason_total{{reason="no_usable_roles"}} {}
authz_denied_reason_total{{reason="not_permitted"}} {}

# HELP authz_unknown_policy_total Evaluations of unregistered policy names
# TYPE authz_unknown_policy_total counter
authz_unknown_policy_total {}
"#,
            metrics.evaluations_total,
            metrics.granted_total,
            metrics.denied_total,
            metrics.denied_unauthenticated,
            metrics.denied_no_usable_roles,
            metrics.denied_not_permitted,
            metrics.unknown_policy_total,
        )
    }
}

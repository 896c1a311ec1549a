//! The access engine: matrix, registry, evaluator, and decision log
//! wired together behind one facade
//!
//! Construction happens once, single-threaded, during process start-up
//! and either completes fully or fails fast. The finished engine is
//! immutable; callers share it behind an `Arc` and evaluate from any
//! number of threads without locking.

pub mod audit;
pub mod decision;
pub mod evaluator;
pub mod metrics;

pub use audit::{ChannelSink, DecisionSink, MemorySink, TracingSink};
pub use decision::{Decision, DecisionReason, DecisionRecord};
pub use evaluator::Evaluator;
pub use metrics::{EngineMetrics, MetricsCollector};

use std::sync::Arc;

use haven_core::Identity;
use tracing::{debug, info, warn};

use crate::error::{AuthzError, Result};
use crate::matrix::{MatrixStats, PermissionMatrix};
use crate::registry::PolicyRegistry;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Enable metrics collection
    pub enable_metrics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
        }
    }
}

/// Process-wide authorization engine
pub struct AccessEngine {
    matrix: Arc<PermissionMatrix>,
    registry: PolicyRegistry,
    evaluator: Evaluator,
    metrics: Option<Arc<MetricsCollector>>,
    config: EngineConfig,
}

impl AccessEngine {
    /// Create an engine over the shipped grant table with defaults
    pub fn builtin() -> Result<Self> {
        Self::new(PermissionMatrix::builtin())
    }

    /// Create an engine over `matrix` with the default configuration
    pub fn new(matrix: PermissionMatrix) -> Result<Self> {
        Self::with_config(matrix, EngineConfig::default())
    }

    /// Create an engine with an explicit configuration
    pub fn with_config(matrix: PermissionMatrix, config: EngineConfig) -> Result<Self> {
        Self::with_sink(matrix, config, Arc::new(TracingSink))
    }

    /// Create an engine with an explicit configuration and decision sink
    ///
    /// # Errors
    ///
    /// Fails if the policy registry cannot be generated; the caller
    /// must treat that as fatal rather than serving with a partial
    /// policy set.
    pub fn with_sink(
        matrix: PermissionMatrix,
        config: EngineConfig,
        sink: Arc<dyn DecisionSink>,
    ) -> Result<Self> {
        let registry = PolicyRegistry::build()?;
        let matrix = Arc::new(matrix);
        let evaluator = Evaluator::with_sink(matrix.clone(), sink);

        let metrics = if config.enable_metrics {
            Some(Arc::new(MetricsCollector::new()))
        } else {
            None
        };

        info!(
            policies = registry.len(),
            metrics = config.enable_metrics,
            "Access engine initialized"
        );

        Ok(Self {
            matrix,
            registry,
            evaluator,
            metrics,
            config,
        })
    }

    /// Evaluate the named policy for `identity`
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::PolicyNotFound`] when `policy` is not in
    /// the generated set. That is a call-site wiring bug, surfaced
    /// loudly instead of being folded into a deny.
    pub fn evaluate(&self, policy: &str, identity: &Identity) -> Result<Decision> {
        debug!(policy = %policy, subject = %identity.subject, "Evaluating policy");

        let Some(requirement) = self.registry.get(policy) else {
            if let Some(metrics) = &self.metrics {
                metrics.record_unknown_policy();
            }
            warn!(policy = %policy, "Evaluation requested for unregistered policy");
            return Err(AuthzError::PolicyNotFound(policy.to_string()));
        };

        let decision = self.evaluator.evaluate(requirement, identity);

        if let Some(metrics) = &self.metrics {
            metrics.record_decision(&decision);
        }

        Ok(decision)
    }

    /// The generated policy set
    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    /// Matrix shape and query counters
    pub fn matrix_stats(&self) -> MatrixStats {
        self.matrix.stats()
    }

    /// Current metrics snapshot, if collection is enabled
    pub fn metrics(&self) -> Option<EngineMetrics> {
        self.metrics.as_ref().map(|metrics| metrics.snapshot())
    }

    /// The configuration the engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Export engine and matrix counters in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let stats = self.matrix.stats();
        let matrix_block = format!(
            "# HELP authz_matrix_lookups_total Permission matrix queries\n\
             # TYPE authz_matrix_lookups_total counter\n\
             authz_matrix_lookups_total {}\n",
            stats.lookups
        );

        match &self.metrics {
            Some(metrics) => format!("{}\n{}", metrics.export_prometheus(), matrix_block),
            None => matrix_block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_creation() {
        let engine = AccessEngine::builtin().unwrap();
        assert_eq!(engine.registry().len(), 61);
        assert!(engine.metrics().is_some());
        assert!(engine.config().enable_metrics);
    }

    #[test]
    fn test_evaluate_known_policy() {
        let engine = AccessEngine::builtin().unwrap();
        let caller = Identity::new("u-1", "Alice").with_claim("IncidentManager");

        let decision = engine.evaluate("incident.create", &caller).unwrap();
        assert!(decision.granted);

        let decision = engine.evaluate("security.configure", &caller).unwrap();
        assert!(!decision.granted);
    }

    #[test]
    fn test_unknown_policy_is_an_error_not_a_deny() {
        let engine = AccessEngine::builtin().unwrap();
        let caller = Identity::new("u-2", "Bob").with_claim("SystemAdmin");

        let err = engine.evaluate("incident.destroy", &caller).unwrap_err();
        assert!(matches!(err, AuthzError::PolicyNotFound(name) if name == "incident.destroy"));

        let metrics = engine.metrics().unwrap();
        assert_eq!(metrics.unknown_policy_total, 1);
        assert_eq!(metrics.evaluations_total, 0);
    }

    #[test]
    fn test_metrics_can_be_disabled() {
        let engine = AccessEngine::with_config(
            PermissionMatrix::builtin(),
            EngineConfig {
                enable_metrics: false,
            },
        )
        .unwrap();

        assert!(engine.metrics().is_none());
        let export = engine.export_prometheus();
        assert!(export.contains("authz_matrix_lookups_total"));
        assert!(!export.contains("authz_evaluations_total"));
    }

    #[test]
    fn test_prometheus_export_includes_matrix_counter() {
        let engine = AccessEngine::builtin().unwrap();
        let caller = Identity::new("u-3", "Cara").with_claim("Employee");
        engine.evaluate("incident.read", &caller).unwrap();

        let export = engine.export_prometheus();
        assert!(export.contains("authz_evaluations_total 1"));
        assert!(export.contains("authz_matrix_lookups_total"));
    }
}

//! End-to-end decision flows through the access engine
//!
//! Exercises the wired pipeline the way the suite's modules use it:
//! bind a generated policy name, hand over the caller identity, act on
//! the boolean, and rely on the decision log for the audit trail.

use std::sync::Arc;

use haven_authz::registry::{
    CROSS_MODULE_ACTIONS, FUNCTIONAL_ADMIN_POLICY, MANAGER_POLICY, SYSTEM_ADMIN_POLICY,
};
use haven_authz::{
    AccessEngine, AuthzError, DecisionReason, EngineConfig, MemorySink, PermissionMatrix,
};
use haven_core::{Action, Identity, Module, Role};

fn engine_with_log() -> (AccessEngine, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new(64));
    let engine = AccessEngine::with_sink(
        PermissionMatrix::builtin(),
        EngineConfig::default(),
        sink.clone(),
    )
    .unwrap();
    (engine, sink)
}

fn caller(subject: &str, claims: &[&str]) -> Identity {
    Identity::new(subject, subject).with_claims(claims.iter().copied())
}

// ============================================================================
// DECISION FLOWS
// ============================================================================

#[test]
fn test_incident_manager_files_incident() {
    let (engine, sink) = engine_with_log();
    let reporter = caller("u-1042", &["IncidentManager"]);

    let decision = engine.evaluate("incident.create", &reporter).unwrap();

    assert!(decision.granted);
    assert_eq!(decision.granted_by(), Some(Role::IncidentManager));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].granted);
    assert_eq!(records[0].subject, "u-1042");
    assert_eq!(records[0].requirement, "permission incident.create");
}

#[test]
fn test_employee_cannot_delete_ppe_assignment() {
    let (engine, sink) = engine_with_log();
    let employee = caller("u-7", &["Employee"]);

    let decision = engine.evaluate("ppe.delete", &employee).unwrap();

    assert!(!decision.granted);
    assert_eq!(decision.reason, DecisionReason::NotPermitted);
    assert_eq!(decision.attempted_claims, vec!["Employee"]);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(!records[0].granted);
    assert_eq!(records[0].attempted_claims, vec!["Employee"]);
}

#[test]
fn test_ppe_module_opens_through_manager_role_only() {
    let (engine, _) = engine_with_log();

    // Holding both roles, the manager grant carries the day.
    let manager = caller("u-21", &["PPEManager", "Employee"]);
    let decision = engine.evaluate("ppe.access", &manager).unwrap();
    assert!(decision.granted);
    assert_eq!(decision.granted_by(), Some(Role::PpeManager));

    // The employee role alone holds nothing in the PPE module.
    let employee = caller("u-22", &["Employee"]);
    let decision = engine.evaluate("ppe.access", &employee).unwrap();
    assert!(!decision.granted);
}

#[test]
fn test_anonymous_caller_denied_without_matrix_consultation() {
    let (engine, sink) = engine_with_log();

    let decision = engine.evaluate("incident.read", &Identity::anonymous()).unwrap();

    assert!(!decision.granted);
    assert_eq!(decision.reason, DecisionReason::Unauthenticated);
    assert_eq!(engine.matrix_stats().lookups, 0);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_legacy_role_name_never_maps_to_a_tier() {
    let (engine, _) = engine_with_log();
    let legacy = caller("u-9", &["SuperUser"]);

    let decision = engine.evaluate(SYSTEM_ADMIN_POLICY, &legacy).unwrap();

    assert!(!decision.granted);
    assert_eq!(decision.reason, DecisionReason::NoRecognizedRoles);
    assert_eq!(decision.attempted_claims, vec!["SuperUser"]);
}

#[test]
fn test_unknown_claim_alone_denies_every_policy_kind() {
    let (engine, _) = engine_with_log();
    let stranger = caller("u-30", &["Superviser"]);

    for policy in ["incident.read", "ppe.access", SYSTEM_ADMIN_POLICY, "any.create"] {
        let decision = engine.evaluate(policy, &stranger).unwrap();
        assert!(!decision.granted, "policy {policy} must deny");
        assert_eq!(decision.reason, DecisionReason::NoRecognizedRoles);
    }
}

#[test]
fn test_unknown_claim_beside_valid_one_is_skipped() {
    let (engine, _) = engine_with_log();
    let migrated = caller("u-31", &["LegacyAdmin", "HSEAdmin"]);

    let decision = engine.evaluate("waste.configure", &migrated).unwrap();

    assert!(decision.granted);
    assert_eq!(decision.granted_by(), Some(Role::HseAdmin));
}

#[test]
fn test_claim_order_decides_credited_role() {
    let (engine, _) = engine_with_log();

    let first = caller("u-40", &["IncidentManager", "SystemAdmin"]);
    let decision = engine.evaluate("incident.create", &first).unwrap();
    assert_eq!(decision.granted_by(), Some(Role::IncidentManager));

    let second = caller("u-40", &["SystemAdmin", "IncidentManager"]);
    let decision = engine.evaluate("incident.create", &second).unwrap();
    assert_eq!(decision.granted_by(), Some(Role::SystemAdmin));
}

#[test]
fn test_role_tier_policies_follow_membership() {
    let (engine, _) = engine_with_log();

    let hse = caller("u-50", &["HSEAdmin"]);
    assert!(engine.evaluate(FUNCTIONAL_ADMIN_POLICY, &hse).unwrap().granted);
    assert!(engine.evaluate(MANAGER_POLICY, &hse).unwrap().granted);
    assert!(!engine.evaluate(SYSTEM_ADMIN_POLICY, &hse).unwrap().granted);

    let employee = caller("u-51", &["Employee"]);
    assert!(!engine.evaluate(MANAGER_POLICY, &employee).unwrap().granted);
}

#[test]
fn test_cross_module_policies_search_all_grants() {
    let (engine, _) = engine_with_log();

    // Employees can create incident and hazard records, so the global
    // "new record" surface is reachable; nothing grants them export.
    let employee = caller("u-60", &["Employee"]);
    assert!(engine.evaluate("any.create", &employee).unwrap().granted);
    assert!(!engine.evaluate("any.export", &employee).unwrap().granted);

    let manager = caller("u-61", &["WasteManager"]);
    assert!(engine.evaluate("any.export", &manager).unwrap().granted);
}

// ============================================================================
// POLICY SURFACE
// ============================================================================

#[test]
fn test_registry_generates_complete_policy_surface() {
    let (engine, _) = engine_with_log();
    let stats = engine.registry().stats();

    assert_eq!(stats.module_action, Module::ALL.len() * Action::ALL.len());
    assert_eq!(stats.module_access, Module::ALL.len());
    assert_eq!(stats.role_set, 3);
    assert_eq!(stats.any_module_action, CROSS_MODULE_ACTIONS.len());
    assert_eq!(engine.registry().len(), 61);
}

#[test]
fn test_unknown_policy_name_is_a_wiring_error() {
    let (engine, sink) = engine_with_log();
    let admin = caller("u-70", &["SystemAdmin"]);

    let err = engine.evaluate("ppe.destroy", &admin).unwrap_err();
    assert!(matches!(err, AuthzError::PolicyNotFound(_)));

    // No decision happened, so nothing was logged.
    assert!(sink.is_empty());
    assert_eq!(engine.metrics().unwrap().unknown_policy_total, 1);
}

// ============================================================================
// OBSERVABILITY
// ============================================================================

#[test]
fn test_every_evaluation_is_recorded_exactly_once() {
    let (engine, sink) = engine_with_log();
    let employee = caller("u-80", &["Employee"]);

    engine.evaluate("incident.create", &employee).unwrap();
    engine.evaluate("ppe.delete", &employee).unwrap();
    engine.evaluate("training.read", &employee).unwrap();
    engine.evaluate("audit.access", &Identity::anonymous()).unwrap();

    assert_eq!(sink.len(), 4);
}

#[test]
fn test_decisions_are_reproducible() {
    let (engine, _) = engine_with_log();
    let inspector = caller("u-90", &["InspectionManager", "Employee"]);

    let first = engine.evaluate("hazard.read", &inspector).unwrap();
    let second = engine.evaluate("hazard.read", &inspector).unwrap();

    assert_eq!(first.granted, second.granted);
    assert_eq!(first.reason, second.reason);
    assert_ne!(first.id, second.id);
}

#[test]
fn test_metrics_reconcile_with_outcomes() {
    let (engine, _) = engine_with_log();
    let employee = caller("u-95", &["Employee"]);

    engine.evaluate("incident.create", &employee).unwrap();
    engine.evaluate("incident.read", &employee).unwrap();
    engine.evaluate("security.access", &employee).unwrap();
    engine.evaluate("waste.access", &Identity::anonymous()).unwrap();

    let metrics = engine.metrics().unwrap();
    assert_eq!(metrics.evaluations_total, 4);
    assert_eq!(metrics.granted_total, 2);
    assert_eq!(metrics.denied_total, 2);
    assert_eq!(metrics.denied_unauthenticated, 1);
    assert_eq!(metrics.denied_not_permitted, 1);
    assert_eq!(
        metrics.granted_total + metrics.denied_total,
        metrics.evaluations_total
    );
}

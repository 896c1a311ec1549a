//! The closed set of decision rules a policy can express
//!
//! Every registered policy resolves to exactly one of these variants.
//! The set is deliberately closed: the evaluator matches it
//! exhaustively, so adding a variant fails to compile until every
//! consumer handles it, and no unhandled rule can ever fall through to
//! an implicit allow.

use haven_core::{Action, Module, Role};
use serde::{Deserialize, Serialize};

use crate::matrix::PermissionMatrix;

/// A single named decision rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Caller must be permitted to perform `action` within `module`
    ModuleAction { module: Module, action: Action },

    /// Caller must be permitted to perform some action within `module`
    ModuleAccess { module: Module },

    /// Caller must hold at least one of `allowed`, regardless of the matrix
    RoleSet { allowed: Vec<Role> },

    /// Caller must be permitted to perform `action` in at least one
    /// module they can access
    ///
    /// Weaker than [`Requirement::ModuleAction`] on purpose: it backs
    /// cross-module surfaces (the global "new record" entry point, the
    /// global export button) where the module is chosen later.
    AnyModuleAction { action: Action },
}

impl Requirement {
    /// Check whether a single role satisfies this requirement
    pub fn satisfied_by(&self, role: Role, matrix: &PermissionMatrix) -> bool {
        match self {
            Requirement::ModuleAction { module, action } => {
                matrix.has_permission(role, *module, *action)
            }
            Requirement::ModuleAccess { module } => matrix.has_module_access(role, *module),
            Requirement::RoleSet { allowed } => allowed.contains(&role),
            Requirement::AnyModuleAction { action } => matrix.has_action_anywhere(role, *action),
        }
    }

    /// Human-readable form used in decision records
    pub fn describe(&self) -> String {
        match self {
            Requirement::ModuleAction { module, action } => {
                format!("permission {}.{}", module, action)
            }
            Requirement::ModuleAccess { module } => format!("access to module {}", module),
            Requirement::RoleSet { allowed } => {
                let names: Vec<&str> = allowed.iter().map(Role::as_str).collect();
                format!("role in [{}]", names.join(", "))
            }
            Requirement::AnyModuleAction { action } => {
                format!("permission {} in any module", action)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixBuilder;

    fn matrix() -> PermissionMatrix {
        MatrixBuilder::new()
            .grant(Role::Employee, Module::Incident, &[Action::Create, Action::Read])
            .grant(Role::AuditManager, Module::Audit, &[Action::Export])
            .build()
    }

    #[test]
    fn test_module_action_follows_matrix() {
        let matrix = matrix();
        let requirement = Requirement::ModuleAction {
            module: Module::Incident,
            action: Action::Create,
        };

        assert!(requirement.satisfied_by(Role::Employee, &matrix));
        assert!(!requirement.satisfied_by(Role::AuditManager, &matrix));
    }

    #[test]
    fn test_module_access_needs_any_grant() {
        let matrix = matrix();
        let requirement = Requirement::ModuleAccess {
            module: Module::Audit,
        };

        assert!(requirement.satisfied_by(Role::AuditManager, &matrix));
        assert!(!requirement.satisfied_by(Role::Employee, &matrix));
    }

    #[test]
    fn test_role_set_ignores_matrix() {
        let matrix = matrix();
        let requirement = Requirement::RoleSet {
            allowed: vec![Role::SystemAdmin, Role::Developer],
        };

        // SystemAdmin has no grants in this matrix, membership still wins.
        assert!(requirement.satisfied_by(Role::SystemAdmin, &matrix));
        assert!(!requirement.satisfied_by(Role::Employee, &matrix));
    }

    #[test]
    fn test_any_module_action_searches_all_modules() {
        let matrix = matrix();
        let requirement = Requirement::AnyModuleAction {
            action: Action::Export,
        };

        assert!(requirement.satisfied_by(Role::AuditManager, &matrix));
        assert!(!requirement.satisfied_by(Role::Employee, &matrix));
    }

    #[test]
    fn test_describe_is_stable() {
        let requirement = Requirement::ModuleAction {
            module: Module::Ppe,
            action: Action::Delete,
        };
        assert_eq!(requirement.describe(), "permission ppe.delete");

        let requirement = Requirement::RoleSet {
            allowed: vec![Role::SystemAdmin, Role::Developer],
        };
        assert_eq!(requirement.describe(), "role in [SystemAdmin, Developer]");
    }

    #[test]
    fn test_serde_kind_tag() {
        let requirement = Requirement::ModuleAccess {
            module: Module::Ppe,
        };
        let json = serde_json::to_string(&requirement).unwrap();
        assert_eq!(json, r#"{"kind":"module_access","module":"ppe"}"#);

        let parsed: Requirement = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, requirement);
    }
}

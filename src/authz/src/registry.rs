//! Policy registry: the deterministic, generated decision surface
//!
//! Every protected operation in the suite binds to a policy name, and
//! every name the registry will ever answer for is generated here at
//! start-up by walking the closed module and action vocabularies. A
//! protected operation therefore cannot reference a policy that does
//! not exist, and a new module picks up its full policy set the moment
//! it is added to the vocabulary.
//!
//! Names are computable without the matrix, so call sites can bind them
//! as constants:
//!
//! - `"<module>.<action>"` for module-scoped permissions
//! - `"<module>.access"` for module entry
//! - `"role.*"` for the fixed role tiers
//! - `"any.<action>"` for cross-module convenience checks

use std::collections::HashMap;

use haven_core::{Action, Module, Role};
use tracing::info;

use crate::error::{AuthzError, Result};
use crate::requirement::Requirement;

/// Policy name for the top administrative tier
pub const SYSTEM_ADMIN_POLICY: &str = "role.system-admin";

/// Policy name for functional administrators and above
pub const FUNCTIONAL_ADMIN_POLICY: &str = "role.functional-admin";

/// Policy name for module managers and above
pub const MANAGER_POLICY: &str = "role.manager";

/// Roles in the top administrative tier
pub const SYSTEM_ADMIN_ROLES: [Role; 2] = [Role::SystemAdmin, Role::Developer];

/// Roles that administer EHS functions
pub const FUNCTIONAL_ADMIN_ROLES: [Role; 3] = [Role::SystemAdmin, Role::Developer, Role::HseAdmin];

/// Roles that manage at least one module
pub const MANAGER_ROLES: [Role; 11] = [
    Role::SystemAdmin,
    Role::Developer,
    Role::HseAdmin,
    Role::IncidentManager,
    Role::HazardManager,
    Role::AuditManager,
    Role::InspectionManager,
    Role::TrainingManager,
    Role::PpeManager,
    Role::WasteManager,
    Role::SecurityManager,
];

/// Actions with a cross-module `any.<action>` policy
pub const CROSS_MODULE_ACTIONS: [Action; 2] = [Action::Create, Action::Export];

/// Compute the policy name guarding `action` within `module`
pub fn module_action_policy(module: Module, action: Action) -> String {
    format!("{}.{}", module, action)
}

/// Compute the policy name guarding entry into `module`
pub fn module_access_policy(module: Module) -> String {
    format!("{}.access", module)
}

/// Compute the cross-module policy name for `action`
pub fn any_action_policy(action: Action) -> String {
    format!("any.{}", action)
}

/// The complete set of named requirements, generated once at start-up
#[derive(Debug)]
pub struct PolicyRegistry {
    policies: HashMap<String, Requirement>,
}

impl PolicyRegistry {
    /// Generate the full policy set
    ///
    /// # Errors
    ///
    /// Returns [`AuthzError::DuplicatePolicy`] if two policies resolve
    /// to the same name. The process must not start serving with an
    /// ambiguous policy set, so callers propagate this at start-up.
    pub fn build() -> Result<Self> {
        let mut registry = Self {
            policies: HashMap::new(),
        };

        for module in Module::ALL {
            for action in Action::ALL {
                registry.add(
                    module_action_policy(module, action),
                    Requirement::ModuleAction { module, action },
                )?;
            }
            registry.add(
                module_access_policy(module),
                Requirement::ModuleAccess { module },
            )?;
        }

        registry.add(
            SYSTEM_ADMIN_POLICY.to_string(),
            Requirement::RoleSet {
                allowed: SYSTEM_ADMIN_ROLES.to_vec(),
            },
        )?;
        registry.add(
            FUNCTIONAL_ADMIN_POLICY.to_string(),
            Requirement::RoleSet {
                allowed: FUNCTIONAL_ADMIN_ROLES.to_vec(),
            },
        )?;
        registry.add(
            MANAGER_POLICY.to_string(),
            Requirement::RoleSet {
                allowed: MANAGER_ROLES.to_vec(),
            },
        )?;

        for action in CROSS_MODULE_ACTIONS {
            registry.add(
                any_action_policy(action),
                Requirement::AnyModuleAction { action },
            )?;
        }

        info!(policies = registry.len(), "Policy registry built");
        Ok(registry)
    }

    /// Look up a requirement by policy name
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        self.policies.get(name)
    }

    /// All registered policy names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.policies.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered policies
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the registry is empty (never true after `build`)
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Per-variant policy counts
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for requirement in self.policies.values() {
            match requirement {
                Requirement::ModuleAction { .. } => stats.module_action += 1,
                Requirement::ModuleAccess { .. } => stats.module_access += 1,
                Requirement::RoleSet { .. } => stats.role_set += 1,
                Requirement::AnyModuleAction { .. } => stats.any_module_action += 1,
            }
        }
        stats.total = self.policies.len();
        stats
    }

    // The generated set is the whole API: nothing registers policies
    // after build, so this stays private.
    fn add(&mut self, name: String, requirement: Requirement) -> Result<()> {
        if self.policies.contains_key(&name) {
            return Err(AuthzError::DuplicatePolicy(name));
        }
        self.policies.insert(name, requirement);
        Ok(())
    }
}

/// Registry shape counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub module_action: usize,
    pub module_access: usize,
    pub role_set: usize,
    pub any_module_action: usize,
    pub total: usize,
}

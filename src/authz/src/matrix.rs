//! Permission matrix: the immutable Role -> (Module, Action) grant table
//!
//! The matrix is built once during process start-up and never mutated
//! afterwards; every query is a pure read. Grants are purely additive:
//! there is no deny entry, and the absence of a grant is an ordinary
//! "no" answer rather than an exception. Elevated roles (`SystemAdmin`,
//! `Developer`) are spelled out as full grants like everyone else, so
//! every allow the engine ever produces is visible in this table.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use haven_core::{Action, Module, Role};

/// Immutable grant table consulted by the evaluator
#[derive(Debug)]
pub struct PermissionMatrix {
    grants: HashMap<Role, HashMap<Module, HashSet<Action>>>,
    /// Query counter, kept so callers can observe matrix traffic
    lookups: AtomicU64,
}

impl PermissionMatrix {
    /// Start building a matrix from an empty grant table
    pub fn builder() -> MatrixBuilder {
        MatrixBuilder::new()
    }

    /// The grant table shipped with the Haven suite
    pub fn builtin() -> Self {
        let mut builder = MatrixBuilder::new()
            .grant_all(Role::SystemAdmin)
            .grant_all(Role::Developer);

        // HSEAdmin runs every EHS module but only reads security cases.
        for module in [
            Module::Incident,
            Module::Hazard,
            Module::Audit,
            Module::Inspection,
            Module::Training,
            Module::Ppe,
            Module::Waste,
        ] {
            builder = builder.grant_module(Role::HseAdmin, module);
        }
        builder = builder.grant(Role::HseAdmin, Module::Security, &[Action::Read, Action::Export]);

        // Each manager owns one module outright, with read visibility
        // into the modules its workflows feed.
        builder = builder
            .grant_module(Role::IncidentManager, Module::Incident)
            .grant(Role::IncidentManager, Module::Hazard, &[Action::Read])
            .grant_module(Role::HazardManager, Module::Hazard)
            .grant(Role::HazardManager, Module::Incident, &[Action::Read])
            .grant_module(Role::AuditManager, Module::Audit)
            .grant(Role::AuditManager, Module::Inspection, &[Action::Read])
            .grant_module(Role::InspectionManager, Module::Inspection)
            .grant(Role::InspectionManager, Module::Audit, &[Action::Read])
            .grant(Role::InspectionManager, Module::Hazard, &[Action::Read])
            .grant_module(Role::TrainingManager, Module::Training)
            .grant_module(Role::PpeManager, Module::Ppe)
            .grant(Role::PpeManager, Module::Training, &[Action::Read])
            .grant_module(Role::WasteManager, Module::Waste)
            .grant_module(Role::SecurityManager, Module::Security)
            .grant(Role::SecurityManager, Module::Incident, &[Action::Read]);

        // Every employee can report incidents and hazards and see their
        // own training record. Nothing else.
        builder
            .grant(Role::Employee, Module::Incident, &[Action::Create, Action::Read])
            .grant(Role::Employee, Module::Hazard, &[Action::Create, Action::Read])
            .grant(Role::Employee, Module::Training, &[Action::Read])
            .build()
    }

    /// Check whether `role` may perform `action` within `module`
    pub fn has_permission(&self, role: Role, module: Module, action: Action) -> bool {
        self.note_lookup();
        self.grants
            .get(&role)
            .and_then(|modules| modules.get(&module))
            .map_or(false, |actions| actions.contains(&action))
    }

    /// Check whether `role` may perform at least one action within `module`
    pub fn has_module_access(&self, role: Role, module: Module) -> bool {
        self.note_lookup();
        self.grants
            .get(&role)
            .and_then(|modules| modules.get(&module))
            .map_or(false, |actions| !actions.is_empty())
    }

    /// Check whether `role` may perform `action` in any module at all
    pub fn has_action_anywhere(&self, role: Role, action: Action) -> bool {
        self.note_lookup();
        self.grants.get(&role).map_or(false, |modules| {
            modules.values().any(|actions| actions.contains(&action))
        })
    }

    /// The modules where `role` holds at least one grant, in canonical order
    ///
    /// A role with no grants yields an empty list, not an error.
    pub fn accessible_modules(&self, role: Role) -> Vec<Module> {
        self.note_lookup();
        let mut modules: Vec<Module> = self
            .grants
            .get(&role)
            .map(|modules| {
                modules
                    .iter()
                    .filter(|(_, actions)| !actions.is_empty())
                    .map(|(module, _)| *module)
                    .collect()
            })
            .unwrap_or_default();
        modules.sort();
        modules
    }

    /// Snapshot of matrix shape and query traffic
    pub fn stats(&self) -> MatrixStats {
        let grant_count = self
            .grants
            .values()
            .flat_map(|modules| modules.values())
            .map(|actions| actions.len())
            .sum();

        MatrixStats {
            roles: self.grants.len(),
            grants: grant_count,
            lookups: self.lookups.load(Ordering::Relaxed),
        }
    }

    fn note_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }
}

/// Matrix shape and usage counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixStats {
    /// Number of roles with an entry (always the full role vocabulary)
    pub roles: usize,
    /// Total number of (role, module, action) grants
    pub grants: usize,
    /// Number of queries answered since construction
    pub lookups: u64,
}

/// Builder for [`PermissionMatrix`]
///
/// Grants are additive: repeated calls for the same role and module
/// merge their action sets. `build` fills an empty entry for every role
/// that received no grants, so the finished matrix is total over the
/// role vocabulary by construction.
#[derive(Debug, Default)]
pub struct MatrixBuilder {
    grants: HashMap<Role, HashMap<Module, HashSet<Action>>>,
}

impl MatrixBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            grants: HashMap::new(),
        }
    }

    /// Grant `actions` on `module` to `role`, merging with prior grants
    pub fn grant(mut self, role: Role, module: Module, actions: &[Action]) -> Self {
        let entry = self
            .grants
            .entry(role)
            .or_default()
            .entry(module)
            .or_default();
        entry.extend(actions.iter().copied());
        self
    }

    /// Grant every action on `module` to `role`
    pub fn grant_module(self, role: Role, module: Module) -> Self {
        self.grant(role, module, &Action::ALL)
    }

    /// Grant every action on every module to `role`
    pub fn grant_all(mut self, role: Role) -> Self {
        for module in Module::ALL {
            self = self.grant(role, module, &Action::ALL);
        }
        self
    }

    /// Finish the matrix, filling empty entries for unlisted roles
    pub fn build(mut self) -> PermissionMatrix {
        for role in Role::ALL {
            self.grants.entry(role).or_default();
        }

        PermissionMatrix {
            grants: self.grants,
            lookups: AtomicU64::new(0),
        }
    }
}

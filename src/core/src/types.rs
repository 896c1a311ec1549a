//! The closed Module/Action/Role vocabulary of the Haven suite
//!
//! Adding a functional module, action kind, or organizational role is a
//! code change here, never runtime registration. Downstream consumers
//! (most importantly the authorization engine) enumerate these types
//! through their `ALL` constants and match them exhaustively, so an
//! addition fails to compile until every consumer handles it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A functional area of the Haven suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Incident,
    Hazard,
    Audit,
    Inspection,
    Training,
    Ppe,
    Waste,
    Security,
}

impl Module {
    /// Every module, in canonical order
    pub const ALL: [Module; 8] = [
        Module::Incident,
        Module::Hazard,
        Module::Audit,
        Module::Inspection,
        Module::Training,
        Module::Ppe,
        Module::Waste,
        Module::Security,
    ];

    /// Get the canonical module name
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Incident => "incident",
            Module::Hazard => "hazard",
            Module::Audit => "audit",
            Module::Inspection => "inspection",
            Module::Training => "training",
            Module::Ppe => "ppe",
            Module::Waste => "waste",
            Module::Security => "security",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Module {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incident" => Ok(Module::Incident),
            "hazard" => Ok(Module::Hazard),
            "audit" => Ok(Module::Audit),
            "inspection" => Ok(Module::Inspection),
            "training" => Ok(Module::Training),
            "ppe" => Ok(Module::Ppe),
            "waste" => Ok(Module::Waste),
            "security" => Ok(Module::Security),
            other => Err(CoreError::UnknownModule(other.to_string())),
        }
    }
}

/// An operation kind applicable across modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Export,
    Configure,
}

impl Action {
    /// Every action kind, in canonical order
    pub const ALL: [Action; 6] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::Export,
        Action::Configure,
    ];

    /// Get the canonical action name
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Export => "export",
            Action::Configure => "configure",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "read" => Ok(Action::Read),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            "export" => Ok(Action::Export),
            "configure" => Ok(Action::Configure),
            other => Err(CoreError::UnknownAction(other.to_string())),
        }
    }
}

/// An organizational role a caller may hold
///
/// The canonical names below are the exact claim strings issued by the
/// identity provider. Parsing is case-sensitive: `"employee"` or a
/// legacy name like `"SuperUser"` is not a role, and the engine treats
/// such claims as unrecognized rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SystemAdmin,
    Developer,
    #[serde(rename = "HSEAdmin")]
    HseAdmin,
    IncidentManager,
    HazardManager,
    AuditManager,
    InspectionManager,
    TrainingManager,
    #[serde(rename = "PPEManager")]
    PpeManager,
    WasteManager,
    SecurityManager,
    Employee,
}

impl Role {
    /// Every role, in canonical order
    pub const ALL: [Role; 12] = [
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
        Role::Employee,
    ];

    /// Get the canonical role name as issued in identity claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SystemAdmin",
            Role::Developer => "Developer",
            Role::HseAdmin => "HSEAdmin",
            Role::IncidentManager => "IncidentManager",
            Role::HazardManager => "HazardManager",
            Role::AuditManager => "AuditManager",
            Role::InspectionManager => "InspectionManager",
            Role::TrainingManager => "TrainingManager",
            Role::PpeManager => "PPEManager",
            Role::WasteManager => "WasteManager",
            Role::SecurityManager => "SecurityManager",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SystemAdmin" => Ok(Role::SystemAdmin),
            "Developer" => Ok(Role::Developer),
            "HSEAdmin" => Ok(Role::HseAdmin),
            "IncidentManager" => Ok(Role::IncidentManager),
            "HazardManager" => Ok(Role::HazardManager),
            "AuditManager" => Ok(Role::AuditManager),
            "InspectionManager" => Ok(Role::InspectionManager),
            "TrainingManager" => Ok(Role::TrainingManager),
            "PPEManager" => Ok(Role::PpeManager),
            "WasteManager" => Ok(Role::WasteManager),
            "SecurityManager" => Ok(Role::SecurityManager),
            "Employee" => Ok(Role::Employee),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

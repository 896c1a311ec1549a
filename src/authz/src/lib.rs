//! # Haven Authorization Engine
//!
//! Module-scoped, role-based authorization for the Haven EHS suite.
//!
//! ## Design
//!
//! - **Closed vocabulary**: modules, actions, and roles are enums from
//!   `haven-core`, so the full decision surface is enumerable at
//!   compile time
//! - **Generated policy set**: every policy name is produced at
//!   start-up by walking the module and action vocabularies; no
//!   protected operation can reference a policy that does not exist
//! - **Additive grants**: the permission matrix has no deny entries;
//!   roles merge by union and absence of a grant means deny
//! - **Pure evaluation**: decisions are synchronous in-memory reads,
//!   never cached and never retried
//! - **Logged outcomes**: every evaluation emits exactly one record
//!   through a pluggable, non-blocking decision sink
//!
//! ## Example
//!
//! ```rust
//! use haven_authz::AccessEngine;
//! use haven_core::Identity;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = AccessEngine::builtin()?;
//!
//!     let reporter = Identity::new("u-1042", "Dana Reyes").with_claim("IncidentManager");
//!     let decision = engine.evaluate("incident.create", &reporter)?;
//!
//!     assert!(decision.granted);
//!     Ok(())
//! }
//! ```

pub mod engine;
pub mod error;
pub mod matrix;
pub mod registry;
pub mod requirement;

// Re-export commonly used types
pub use engine::{
    AccessEngine, ChannelSink, Decision, DecisionReason, DecisionRecord, DecisionSink,
    EngineConfig, EngineMetrics, Evaluator, MemorySink, MetricsCollector, TracingSink,
};
pub use error::{AuthzError, Result};
pub use matrix::{MatrixBuilder, MatrixStats, PermissionMatrix};
pub use registry::{PolicyRegistry, RegistryStats};
pub use requirement::Requirement;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

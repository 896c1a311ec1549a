//! # Haven Core
//!
//! Shared vocabulary and error handling for the Haven EHS suite.
//! Every functional module and the authorization engine consume the
//! closed `Module`/`Action`/`Role` vocabulary defined here, so the
//! full surface of the product is enumerable at compile time.

pub mod error;
pub mod identity;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use identity::Identity;
pub use types::{Action, Module, Role};

//! Unified error types for the Haven suite
//!
//! This module provides a central error type shared by the functional
//! modules and the authorization engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for the Haven suite
#[derive(Debug, Error)]
pub enum CoreError {
    /// Record or form validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistence layer errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Authentication/Authorization errors
    #[error("Auth error: {0}")]
    Auth(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A string that is not a canonical module name
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// A string that is not a canonical action name
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A string that is not a canonical role name
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        CoreError::Storage(msg.into())
    }

    /// Create an auth error
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        CoreError::Auth(msg.into())
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CoreError::Serialization(msg.into())
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        CoreError::Configuration(msg.into())
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        CoreError::NotFound(msg.into())
    }
}

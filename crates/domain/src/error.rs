//! Unified error type for the domain layer

use thiserror::Error;

/// Errors from domain constructors and invariant checks
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., empty required field)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID value
    #[error("Invalid ID: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Creates a validation error for violated entity invariants.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

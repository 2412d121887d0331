//! Error types for repository operations.

/// Repository operation errors with context for debugging.
///
/// Absence of a record is never an error here: single-item lookups
/// return `Option` and deletes of missing ids succeed silently.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No repository handle is bound and no initialization is in flight.
    #[error("{entity_type} repository not initialized")]
    NotInitialized { entity_type: &'static str },

    /// The shared client reported ready but yielded no usable connection.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A stored record failed shape validation - includes the offending
    /// id for diagnosis.
    #[error("Decode error for {entity_type} {id}: {message}")]
    Decode {
        entity_type: &'static str,
        id: String,
        message: String,
    },

    /// The backend call itself failed - includes operation name for tracing.
    #[error("Backend error in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl RepositoryError {
    /// Create a NotInitialized error for the given entity type.
    pub fn not_initialized(entity_type: &'static str) -> Self {
        Self::NotInitialized { entity_type }
    }

    /// Create a Configuration error.
    pub fn configuration(message: impl ToString) -> Self {
        Self::Configuration(message.to_string())
    }

    /// Create a Decode error tagged with the offending record id.
    pub fn decode(entity_type: &'static str, id: impl ToString, message: impl ToString) -> Self {
        Self::Decode {
            entity_type,
            id: id.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Backend error with operation context.
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }

    /// Check if this is a NotInitialized error.
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized { .. })
    }

    /// Check if this is a Decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

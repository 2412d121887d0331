//! Workspace entity - The top-level container owning a set of users

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A tenant workspace.
///
/// Ids are caller-supplied and stable; the backend never generates them.
/// The wire shape is exact: unknown fields reject during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

impl Workspace {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let name = name.into();
        if id.is_empty() {
            return Err(DomainError::invalid_id("workspace id cannot be empty"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("workspace name cannot be empty"));
        }
        Ok(Self { id, name })
    }
}

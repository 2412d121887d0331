//! User entity - A dashboard user belonging to exactly one workspace

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A user scoped to a workspace.
///
/// `workspace_id` is a foreign key into the workspace collection; the
/// data-access layer does not enforce referential integrity, callers do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct User {
    pub id: String,
    pub workspace_id: String,
    pub email: String,
    pub name: String,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        workspace_id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let workspace_id = workspace_id.into();
        let email = email.into();
        if id.is_empty() {
            return Err(DomainError::invalid_id("user id cannot be empty"));
        }
        if workspace_id.is_empty() {
            return Err(DomainError::invalid_id("user workspace id cannot be empty"));
        }
        if email.is_empty() {
            return Err(DomainError::validation("user email cannot be empty"));
        }
        Ok(Self {
            id,
            workspace_id,
            email,
            name: name.into(),
        })
    }
}

/// Display initials for a user, preferring the name over the email.
///
/// The email's domain part is stripped before splitting, so
/// `"erika.example@example.com"` yields `"E."` and `"Erika Example"`
/// yields `"EE"`. A missing half is rendered as `.`.
pub fn user_initials(name: Option<&str>, email: Option<&str>) -> String {
    let source = name
        .filter(|s| !s.trim().is_empty())
        .or(email)
        .unwrap_or("");
    let local = source.trim();
    let local = local.split('@').next().unwrap_or("");
    let mut parts = local.split_whitespace().map(str::trim);
    let first = parts.next().and_then(|p| p.chars().next()).unwrap_or('.');
    let last = parts.last().and_then(|p| p.chars().next()).unwrap_or('.');
    format!("{first}{last}").to_uppercase()
}

impl User {
    /// Initials for display chips, from the user's name or email.
    pub fn initials(&self) -> String {
        user_initials(Some(&self.name), Some(&self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_from_full_name() {
        assert_eq!(user_initials(Some("Erika Example"), None), "EE");
    }

    #[test]
    fn initials_fall_back_to_email_local_part() {
        assert_eq!(user_initials(None, Some("erika@example.com")), "E.");
    }

    #[test]
    fn initials_from_three_names_take_first_and_last() {
        assert_eq!(user_initials(Some("Anna Beth Carter"), None), "AC");
    }

    #[test]
    fn initials_when_nothing_known() {
        assert_eq!(user_initials(None, None), "..");
    }

    #[test]
    fn rejects_unknown_wire_fields() {
        let result: Result<User, _> = serde_json::from_str(
            r#"{"id":"u1","workspaceId":"w1","email":"a@b.c","name":"A","x":true}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn workspace_id_uses_camel_case_on_the_wire() {
        let user = User::new("u1", "w1", "a@b.c", "A").expect("valid user");
        let json = serde_json::to_value(&user).expect("serializable");
        assert_eq!(json["workspaceId"], "w1");
    }
}

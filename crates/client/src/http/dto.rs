//! Wire DTOs for the dashboard API.
//!
//! Shape validation is exact: every DTO rejects unknown fields so a
//! drifted backend surfaces as a typed error instead of silently
//! dropping data.

use opsboard_domain::{User, Workspace};
use serde::{Deserialize, Serialize};

/// Service root resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IndexDto {
    pub hello: String,
}

/// The signed-in account's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileDto {
    pub email: String,
}

/// Session token issued by the email-challenge flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmailTokenDto {
    pub token: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl EmailTokenDto {
    pub fn is_verified(&self) -> bool {
        self.verified.unwrap_or(false)
    }
}

/// Request body starting the email challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AuthenticateEmailDto {
    pub email: String,
}

/// Request body re-validating an existing token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifyEmailTokenDto {
    pub token: EmailTokenDto,
}

/// Request body completing the challenge with the emailed code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VerifyEmailCodeDto {
    pub token: EmailTokenDto,
    pub code: String,
}

/// Workspace list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspaceListDto {
    pub payload: Vec<Workspace>,
}

/// User list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserListDto {
    pub payload: Vec<User>,
}

/// Response to workspace creation: the workspace plus the users the
/// backend seeded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewWorkspaceDto {
    pub payload: Workspace,
    pub users: Vec<User>,
}

/// Request body creating a workspace. The id is assigned server-side;
/// the sentinel `new` marks the request as a creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewWorkspaceRequest {
    pub id: String,
    pub name: String,
}

impl NewWorkspaceRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: "new".to_string(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_reject() {
        let result: Result<ProfileDto, _> =
            serde_json::from_str(r#"{"email":"a@b.c","role":"admin"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn token_verified_defaults_to_false() {
        let token: EmailTokenDto =
            serde_json::from_str(r#"{"token":"t","email":"a@b.c"}"#).unwrap();
        assert!(!token.is_verified());
    }

    #[test]
    fn unverified_token_serializes_without_the_field() {
        let token = EmailTokenDto {
            token: "t".into(),
            email: "a@b.c".into(),
            verified: None,
        };
        let json = serde_json::to_string(&token).unwrap();
        assert!(!json.contains("verified"));
    }
}

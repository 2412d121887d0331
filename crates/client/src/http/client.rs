//! Dashboard API client.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use opsboard_domain::{User, Workspace};

use super::dto::{
    AuthenticateEmailDto, EmailTokenDto, IndexDto, NewWorkspaceDto, NewWorkspaceRequest,
    ProfileDto, UserListDto, VerifyEmailCodeDto, VerifyEmailTokenDto, WorkspaceListDto,
};
use super::paths;

/// Default dashboard API base URL.
pub const DEFAULT_DASHBOARD_BASE_URL: &str = "http://localhost:3000/api";

/// Errors from dashboard API calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The call needs a session token and none is set.
    #[error("Not authenticated: {0}")]
    NotAuthenticated(&'static str),

    /// Transport-level failure, propagated unchanged.
    #[error("Request to {endpoint} failed: {message}")]
    Request {
        endpoint: &'static str,
        message: String,
    },

    /// The backend answered with an unexpected status or shape.
    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse {
        endpoint: &'static str,
        message: String,
    },
}

impl ClientError {
    fn request(endpoint: &'static str, message: impl ToString) -> Self {
        Self::Request {
            endpoint,
            message: message.to_string(),
        }
    }

    fn unexpected(endpoint: &'static str, message: impl ToString) -> Self {
        Self::UnexpectedResponse {
            endpoint,
            message: message.to_string(),
        }
    }
}

/// Client for the dashboard backend API.
///
/// Holds the session token from the email-challenge flow and the
/// currently selected workspace. Cheap to share behind an `Arc`; all
/// methods take `&self`.
pub struct DashboardClient {
    client: reqwest::Client,
    base_url: String,
    session_token: RwLock<Option<EmailTokenDto>>,
    workspace_id: RwLock<Option<String>>,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_token: RwLock::new(None),
            workspace_id: RwLock::new(None),
        }
    }

    /// Create a client from the `OPSBOARD_DASHBOARD_URL` environment
    /// variable, falling back to the default.
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPSBOARD_DASHBOARD_URL")
            .unwrap_or_else(|_| DEFAULT_DASHBOARD_BASE_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Currently selected workspace, if any.
    pub fn workspace_id(&self) -> Option<String> {
        self.workspace_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_workspace_id(&self, workspace_id: Option<String>) {
        *self
            .workspace_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = workspace_id;
    }

    pub fn session_token(&self) -> Option<EmailTokenDto> {
        self.session_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set or unset the session token.
    pub fn set_session_token(&self, token: Option<EmailTokenDto>) {
        *self
            .session_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }

    pub fn has_verified_session(&self) -> bool {
        self.session_token()
            .map(|token| token.is_verified())
            .unwrap_or(false)
    }

    /// The email address saved in the session. Might not be verified.
    pub fn email_address(&self) -> Option<String> {
        self.session_token().map(|token| token.email)
    }

    /// The verified email address in the session, if any.
    pub fn verified_email_address(&self) -> Option<String> {
        if self.has_verified_session() {
            self.email_address()
        } else {
            None
        }
    }

    /// Returns the service root resource.
    pub async fn get_index(&self) -> Result<IndexDto, ClientError> {
        self.get_json("get_index", paths::INDEX_PATH.to_string(), None)
            .await
    }

    /// Returns the signed-in account's profile.
    pub async fn get_my_profile(&self) -> Result<ProfileDto, ClientError> {
        let token = self.auth_token("get_my_profile")?;
        self.get_json("get_my_profile", paths::MY_PROFILE_PATH.to_string(), Some(&token))
            .await
    }

    /// Start the email challenge: the backend mails a secret code to
    /// `email` and returns an unverified token.
    ///
    /// This does not save the token; see [`Self::login_using_email`].
    pub async fn authenticate_using_email(
        &self,
        email: &str,
        language: Option<&str>,
    ) -> Result<EmailTokenDto, ClientError> {
        let mut path = paths::AUTHENTICATE_EMAIL_PATH.to_string();
        if let Some(language) = language {
            path = format!(
                "{path}?{}={}",
                paths::QUERY_PARAM_LANGUAGE,
                urlencode(language)
            );
        }
        self.post_json(
            "authenticate_using_email",
            path,
            &AuthenticateEmailDto {
                email: email.to_string(),
            },
            None,
        )
        .await
    }

    /// Re-validate an existing token against the backend.
    pub async fn verify_email_token(
        &self,
        token: &EmailTokenDto,
    ) -> Result<EmailTokenDto, ClientError> {
        self.post_json(
            "verify_email_token",
            paths::VERIFY_EMAIL_TOKEN_PATH.to_string(),
            &VerifyEmailTokenDto {
                token: token.clone(),
            },
            None,
        )
        .await
    }

    /// Complete the challenge with the code from the email message.
    pub async fn verify_email_code(
        &self,
        token: &EmailTokenDto,
        code: &str,
    ) -> Result<EmailTokenDto, ClientError> {
        self.post_json(
            "verify_email_code",
            paths::VERIFY_EMAIL_CODE_PATH.to_string(),
            &VerifyEmailCodeDto {
                token: token.clone(),
                code: code.to_string(),
            },
            None,
        )
        .await
    }

    /// Start the email challenge and save the (unverified) token as the
    /// session. Follow up with [`Self::verify_session_with_code`].
    pub async fn login_using_email(&self, email: &str) -> Result<(), ClientError> {
        let token = self.authenticate_using_email(email, None).await?;
        self.set_session_token(Some(token));
        Ok(())
    }

    /// Verify the saved session with the emailed code.
    pub async fn verify_session_with_code(&self, code: &str) -> Result<(), ClientError> {
        let token = self
            .session_token()
            .ok_or(ClientError::NotAuthenticated("no session, log in first"))?;
        let verified = self.verify_email_code(&token, code).await?;
        self.set_session_token(Some(verified));
        Ok(())
    }

    /// Re-validate the saved session token.
    pub async fn refresh_session(&self) -> Result<(), ClientError> {
        let token = self
            .session_token()
            .ok_or(ClientError::NotAuthenticated("no session, log in first"))?;
        let refreshed = self.verify_email_token(&token).await?;
        self.set_session_token(Some(refreshed));
        Ok(())
    }

    /// Create a workspace and return the full backend response,
    /// including any seeded users.
    pub async fn create_workspace_with_resources(
        &self,
        name: &str,
    ) -> Result<NewWorkspaceDto, ClientError> {
        let token = self.auth_token("create_workspace")?;
        self.post_json(
            "create_workspace",
            paths::MY_WORKSPACE_LIST_PATH.to_string(),
            &NewWorkspaceRequest::new(name),
            Some(&token),
        )
        .await
    }

    /// Create a workspace and return the workspace only.
    pub async fn create_workspace(&self, name: &str) -> Result<Workspace, ClientError> {
        let dto = self.create_workspace_with_resources(name).await?;
        Ok(dto.payload)
    }

    /// Replace a workspace's fields wholesale. This is full-record
    /// replacement; read-modify-write for partial changes.
    pub async fn update_workspace(&self, workspace: &Workspace) -> Result<Workspace, ClientError> {
        let token = self.auth_token("update_workspace")?;
        self.post_json(
            "update_workspace",
            paths::workspace_path(&workspace.id),
            workspace,
            Some(&token),
        )
        .await
    }

    /// Fetch the signed-in account's workspaces.
    pub async fn get_my_workspace_list(&self) -> Result<Vec<Workspace>, ClientError> {
        let token = self.auth_token("get_my_workspace_list")?;
        let dto: WorkspaceListDto = self
            .get_json(
                "get_my_workspace_list",
                paths::MY_WORKSPACE_LIST_PATH.to_string(),
                Some(&token),
            )
            .await?;
        Ok(dto.payload)
    }

    /// Delete every workspace of the signed-in account.
    pub async fn delete_workspaces(&self) -> Result<(), ClientError> {
        let token = self.auth_token("delete_workspaces")?;
        self.delete("delete_workspaces", paths::MY_WORKSPACE_LIST_PATH.to_string(), &token)
            .await
    }

    /// Create a user in the workspace named by `user.workspace_id`.
    pub async fn create_workspace_user(&self, user: &User) -> Result<User, ClientError> {
        let token = self.auth_token("create_workspace_user")?;
        self.post_json(
            "create_workspace_user",
            paths::workspace_user_list_path(&user.workspace_id),
            user,
            Some(&token),
        )
        .await
    }

    /// Fetch the users of one workspace.
    pub async fn get_workspace_user_list(
        &self,
        workspace_id: &str,
    ) -> Result<Vec<User>, ClientError> {
        let token = self.auth_token("get_workspace_user_list")?;
        let dto: UserListDto = self
            .get_json(
                "get_workspace_user_list",
                paths::workspace_user_list_path(workspace_id),
                Some(&token),
            )
            .await?;
        Ok(dto.payload)
    }

    /// Fetch one user of one workspace.
    pub async fn get_workspace_user(
        &self,
        workspace_id: &str,
        user_id: &str,
    ) -> Result<User, ClientError> {
        let token = self.auth_token("get_workspace_user")?;
        self.get_json(
            "get_workspace_user",
            paths::workspace_user_path(workspace_id, user_id),
            Some(&token),
        )
        .await
    }

    /// Replace a user's fields wholesale.
    pub async fn update_workspace_user(
        &self,
        workspace_id: &str,
        user_id: &str,
        user: &User,
    ) -> Result<User, ClientError> {
        let token = self.auth_token("update_workspace_user")?;
        self.post_json(
            "update_workspace_user",
            paths::workspace_user_path(workspace_id, user_id),
            user,
            Some(&token),
        )
        .await
    }

    // PRIVATE METHODS

    fn auth_token(&self, endpoint: &'static str) -> Result<String, ClientError> {
        self.session_token()
            .map(|token| token.token)
            .ok_or(ClientError::NotAuthenticated(endpoint))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: String,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            request = request.header(paths::AUTHORIZATION_HEADER, token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::request(endpoint, e))?;
        Self::read_json(endpoint, response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: String,
        body: &B,
        token: Option<&str>,
    ) -> Result<T, ClientError> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(token) = token {
            request = request.header(paths::AUTHORIZATION_HEADER, token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::request(endpoint, e))?;
        Self::read_json(endpoint, response).await
    }

    async fn delete(
        &self,
        endpoint: &'static str,
        path: String,
        token: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(format!("{}{}", self.base_url, path))
            .header(paths::AUTHORIZATION_HEADER, token)
            .send()
            .await
            .map_err(|e| ClientError::request(endpoint, e))?;
        if !response.status().is_success() {
            return Err(ClientError::unexpected(endpoint, response.status()));
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("(unreadable body: {e})"));
            debug!(endpoint, %status, "dashboard request rejected");
            return Err(ClientError::unexpected(
                endpoint,
                format!("{status}: {body}"),
            ));
        }
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::request(endpoint, e))?;
        serde_json::from_str(&body).map_err(|e| ClientError::unexpected(endpoint, e))
    }
}

fn urlencode(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, percent_encoding::NON_ALPHANUMERIC).to_string()
}

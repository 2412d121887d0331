//! Dashboard API paths, query keys, and header names.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// `GET /`
pub const INDEX_PATH: &str = "/";

/// `POST /authenticateEmail`
pub const AUTHENTICATE_EMAIL_PATH: &str = "/authenticateEmail";

/// `POST /verifyEmailToken`
pub const VERIFY_EMAIL_TOKEN_PATH: &str = "/verifyEmailToken";

/// `POST /verifyEmailCode`
pub const VERIFY_EMAIL_CODE_PATH: &str = "/verifyEmailCode";

/// `GET|POST|DELETE /my/workspaces`
pub const MY_WORKSPACE_LIST_PATH: &str = "/my/workspaces";

/// `GET /my/profile`
pub const MY_PROFILE_PATH: &str = "/my/profile";

/// Header carrying the session token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Query key: id list
pub const QUERY_PARAM_ID_LIST: &str = "i";

/// Query key: email message language
pub const QUERY_PARAM_LANGUAGE: &str = "l";

/// `POST /my/workspaces/{workspaceId}`
pub fn workspace_path(workspace_id: &str) -> String {
    format!("{MY_WORKSPACE_LIST_PATH}/{}", encode_component(workspace_id))
}

/// `GET|POST /my/workspaces/{workspaceId}/users`
pub fn workspace_user_list_path(workspace_id: &str) -> String {
    format!(
        "{MY_WORKSPACE_LIST_PATH}/{}/users",
        encode_component(workspace_id)
    )
}

/// `GET|POST /my/workspaces/{workspaceId}/users/{userId}`
pub fn workspace_user_path(workspace_id: &str, user_id: &str) -> String {
    format!(
        "{MY_WORKSPACE_LIST_PATH}/{}/users/{}",
        encode_component(workspace_id),
        encode_component(user_id)
    )
}

/// The characters `encodeURIComponent` leaves unescaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

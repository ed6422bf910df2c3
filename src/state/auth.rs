//! Auth-session state and its reducer.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by the session container, route guards, and user-aware components to
//! coordinate login redirects and identity-dependent rendering.
//!
//! DESIGN
//! ======
//! Every mutation goes through [`reduce`] with one of the closed set of
//! [`AuthAction`] variants. `LoginSuccess` and `LoginError` are the only
//! actions that touch both `user` and `access_token`, which keeps
//! `is_authenticated` in lockstep with them.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::Serialize;

use crate::net::types::User;

/// Authentication state tracking the current user, token, and loading status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for AuthState {
    /// Session start: unauthenticated and loading until the stored token is checked.
    fn default() -> Self {
        Self { is_authenticated: false, user: None, access_token: None, is_loading: true, error: None }
    }
}

impl AuthState {
    /// `is_authenticated` holds exactly when both a user and a token are present.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.is_authenticated == (self.user.is_some() && self.access_token.is_some())
    }
}

/// State transitions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthAction {
    LoginSuccess { user: User, access_token: String },
    LoginError(String),
    Logout,
    SetLoading(bool),
    UpdateUser(User),
    SetError(Option<String>),
}

impl AuthAction {
    /// Stable name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSuccess { .. } => "LOGIN_SUCCESS",
            Self::LoginError(_) => "LOGIN_ERROR",
            Self::Logout => "LOGOUT",
            Self::SetLoading(_) => "SET_LOADING",
            Self::UpdateUser(_) => "UPDATE_USER",
            Self::SetError(_) => "SET_ERROR",
        }
    }
}

/// Apply `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(state: &AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::LoginSuccess { user, access_token } => AuthState {
            is_authenticated: true,
            user: Some(user),
            access_token: Some(access_token),
            is_loading: false,
            error: None,
        },
        AuthAction::LoginError(message) => AuthState {
            is_authenticated: false,
            user: None,
            access_token: None,
            is_loading: false,
            error: Some(message),
        },
        AuthAction::Logout => AuthState { is_loading: false, ..AuthState::default() },
        AuthAction::SetLoading(is_loading) => AuthState { is_loading, ..state.clone() },
        AuthAction::UpdateUser(user) => AuthState { user: Some(user), ..state.clone() },
        AuthAction::SetError(error) => AuthState { error, ..state.clone() },
    }
}

//! Auth session container.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AuthSession` exists per application session. UI code calls its
//! operations and renders from [`AuthSession::state`] or a
//! [`AuthSession::subscribe`] receiver; route guards watch the same receiver.
//!
//! DESIGN
//! ======
//! State lives in a `tokio::sync::watch` channel and is only ever changed by
//! `dispatch`, which runs the pure reducer in `state::auth`. Operations are
//! `&self` and suspend only while awaiting the backend, so two overlapping
//! calls interleave their transitions (last writer wins).
//!
//! ERROR HANDLING
//! ==============
//! Failed operations record the failure in state first and then return the
//! error, so callers can react (toast, focus a field) while every subscriber
//! already sees the failure. `logout` never fails. `refresh_token` failure
//! forces a full logout instead of recording an error.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tokio::sync::watch;

use crate::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::types::{ProfileUpdate, SessionGrant};
use crate::state::auth::{AuthAction, AuthState, reduce};
use crate::storage::TokenStore;

pub struct AuthSession<A, S> {
    api: A,
    store: S,
    state: watch::Sender<AuthState>,
}

impl<A: AuthApi, S: TokenStore> AuthSession<A, S> {
    /// Create a session in the initial loading state. Call [`Self::initialize`] next.
    pub fn new(api: A, store: S) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { api, store, state }
    }

    // =========================================================================
    // STATE ACCESS
    // =========================================================================

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Bearer token currently held in memory.
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token.clone()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn dispatch(&self, action: AuthAction) {
        tracing::debug!(action = action.name(), "auth transition");
        self.state.send_modify(|state| *state = reduce(state, action));
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Restore a session from the durable store.
    ///
    /// Without a stored token this only clears the loading flag. A stored token
    /// is validated against the backend; a rejected token is deleted and the
    /// state records `"Invalid token"`.
    pub async fn initialize(&self) {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "token store unreadable; starting signed out");
                None
            }
        };

        let Some(token) = stored else {
            self.dispatch(AuthAction::SetLoading(false));
            return;
        };

        match self.api.validate_token(&token).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "session restored");
                self.dispatch(AuthAction::LoginSuccess { user, access_token: token });
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored token rejected");
                self.discard_stored_token();
                self.dispatch(AuthAction::LoginError(AuthError::InvalidToken.to_string()));
            }
        }
    }

    /// Sign in with email and password, persisting the returned token.
    ///
    /// # Errors
    ///
    /// Returns the backend or storage error after recording it via `LoginError`.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.dispatch(AuthAction::SetLoading(true));
        match self.sign_in(email, password).await {
            Ok(grant) => {
                tracing::info!(user_id = %grant.user.id, "login succeeded");
                self.dispatch(AuthAction::LoginSuccess { user: grant.user, access_token: grant.access_token });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.dispatch(AuthAction::LoginError(e.to_string()));
                Err(e)
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionGrant, AuthError> {
        let grant = self.api.login(email, password).await?;
        self.store.save(&grant.access_token)?;
        Ok(grant)
    }

    /// Sign out. The backend call is best-effort; local state and the stored
    /// token are always cleared.
    ///
    /// With no token held there is nothing to revoke, so the `POST
    /// /api/auth/logout` request is skipped and only local state is cleared.
    pub async fn logout(&self) {
        if let Some(token) = self.access_token() {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "logout request failed; clearing local session anyway");
            }
        }
        self.discard_stored_token();
        self.dispatch(AuthAction::Logout);
        tracing::info!("logged out");
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// # Errors
    ///
    /// Returns the registration or follow-up login error after recording it via `SetError`.
    pub async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<(), AuthError> {
        self.dispatch(AuthAction::SetLoading(true));
        if let Err(e) = self.api.register(email, password, name).await {
            tracing::warn!(error = %e, "registration failed");
            return Err(self.fail(e));
        }
        tracing::info!("registration succeeded; signing in");
        self.login(email, password).await.map_err(|e| self.fail(e))
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it via `SetError`.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        self.dispatch(AuthAction::SetLoading(true));
        match self.api.reset_password(email).await {
            Ok(()) => {
                self.dispatch(AuthAction::SetLoading(false));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "password reset failed");
                Err(self.fail(e))
            }
        }
    }

    /// Patch the current user's profile and adopt the server's copy.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingToken`] when signed out, or the backend
    /// error, after recording it via `SetError`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), AuthError> {
        self.dispatch(AuthAction::SetLoading(true));
        let result = match self.access_token() {
            Some(token) => self.api.update_profile(&token, update).await,
            None => Err(AuthError::MissingToken),
        };
        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "profile updated");
                self.dispatch(AuthAction::UpdateUser(user));
                self.dispatch(AuthAction::SetLoading(false));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile update failed");
                Err(self.fail(e))
            }
        }
    }

    /// Exchange the held token for a fresh one.
    ///
    /// # Errors
    ///
    /// Any failure, including having no token, signs the session out (state
    /// and stored token) and returns the error.
    pub async fn refresh_token(&self) -> Result<(), AuthError> {
        match self.renew().await {
            Ok(grant) => {
                tracing::debug!(user_id = %grant.user.id, "token refreshed");
                self.dispatch(AuthAction::LoginSuccess { user: grant.user, access_token: grant.access_token });
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed; signing out");
                self.discard_stored_token();
                self.dispatch(AuthAction::Logout);
                Err(e)
            }
        }
    }

    async fn renew(&self) -> Result<SessionGrant, AuthError> {
        let token = self.access_token().ok_or(AuthError::MissingToken)?;
        let grant = self.api.refresh_token(&token).await?;
        self.store.save(&grant.access_token)?;
        Ok(grant)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Record `err` in state, end the loading phase, and hand the error back.
    fn fail(&self, err: AuthError) -> AuthError {
        self.dispatch(AuthAction::SetError(Some(err.to_string())));
        self.dispatch(AuthAction::SetLoading(false));
        err
    }

    fn discard_stored_token(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to remove stored token");
        }
    }
}

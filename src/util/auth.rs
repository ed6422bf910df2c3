//! Shared auth route-guard helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected routes should apply identical unauthenticated redirect behavior:
//! wait while the session is still loading, then send signed-out users to the
//! login path.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use tokio::sync::watch;

use crate::state::auth::AuthState;

pub const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; render a placeholder.
    Pending,
    Allow,
    /// Navigate to this path, replacing the current history entry.
    Redirect(String),
}

/// `true` once auth has loaded and no authenticated user is present.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.is_loading && !state.is_authenticated
}

#[must_use]
pub fn guard_decision(state: &AuthState, redirect_to: &str) -> GuardDecision {
    if state.is_loading {
        GuardDecision::Pending
    } else if should_redirect_unauth(state) {
        GuardDecision::Redirect(redirect_to.to_owned())
    } else {
        GuardDecision::Allow
    }
}

/// Watch session state and call `navigate` each time the guard starts
/// redirecting. Runs until the session is dropped and returns how many
/// redirects were issued.
pub async fn enforce_protected_route<F>(mut auth: watch::Receiver<AuthState>, redirect_to: &str, mut navigate: F) -> usize
where
    F: FnMut(&str),
{
    let mut redirects = 0;
    let mut redirecting = false;
    loop {
        let decision = guard_decision(&auth.borrow_and_update(), redirect_to);
        match decision {
            GuardDecision::Redirect(path) => {
                if !redirecting {
                    tracing::debug!(%path, "redirecting unauthenticated user");
                    navigate(&path);
                    redirects += 1;
                }
                redirecting = true;
            }
            GuardDecision::Pending | GuardDecision::Allow => redirecting = false,
        }
        if auth.changed().await.is_err() {
            return redirects;
        }
    }
}

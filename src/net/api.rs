//! REST client for the `/api/auth/*` endpoints.
//!
//! DESIGN
//! ======
//! `AuthApi` is the seam the session container talks to; `HttpAuthApi` is the
//! reqwest implementation. Tests substitute scripted mocks.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures map to `AuthError::Transport`. Non-success statuses map
//! to `AuthError::Rejected` carrying the server's `message` field, or a
//! per-endpoint default when the body has none.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::types::{
    ErrorBody, LoginRequest, ProfileUpdate, RegisterRequest, ResetPasswordRequest, SessionGrant, User, UserEnvelope,
};
use crate::config::ClientConfig;
use crate::error::AuthError;

pub const VALIDATE_TOKEN_PATH: &str = "/api/auth/validate-token";
pub const LOGIN_PATH: &str = "/api/auth/login";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";
pub const PROFILE_PATH: &str = "/api/auth/profile";
pub const REFRESH_TOKEN_PATH: &str = "/api/auth/refresh-token";

const LOGIN_FAILED: &str = "Login failed";
const LOGOUT_FAILED: &str = "Logout failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const PASSWORD_RESET_FAILED: &str = "Password reset failed";
const PROFILE_UPDATE_FAILED: &str = "Profile update failed";
const TOKEN_REFRESH_FAILED: &str = "Token refresh failed";

// =============================================================================
// AUTH API TRAIT
// =============================================================================

/// Backend operations the session container depends on. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// `GET /api/auth/validate-token` with the bearer token; returns the token's user.
    async fn validate_token(&self, token: &str) -> Result<User, AuthError>;

    /// `POST /api/auth/login`.
    async fn login(&self, email: &str, password: &str) -> Result<SessionGrant, AuthError>;

    /// `POST /api/auth/logout` with the bearer token. The response body is ignored.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// `POST /api/auth/register`. The response body is ignored.
    async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<(), AuthError>;

    /// `POST /api/auth/reset-password`. The response body is ignored.
    async fn reset_password(&self, email: &str) -> Result<(), AuthError>;

    /// `PATCH /api/auth/profile` with the bearer token; returns the updated user.
    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, AuthError>;

    /// `POST /api/auth/refresh-token` with the bearer token.
    async fn refresh_token(&self, token: &str) -> Result<SessionGrant, AuthError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpAuthApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// Build a client for `config.api_base_url` with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if reqwest cannot build the client.
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(&self.base_url, path)
    }
}

#[async_trait::async_trait]
impl AuthApi for HttpAuthApi {
    async fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        let request = self.http.get(self.url(VALIDATE_TOKEN_PATH)).bearer_auth(token);
        let body = match send(request, "Invalid token").await {
            Ok(body) => body,
            Err(AuthError::Rejected { status, .. }) => {
                tracing::debug!(status, "token validation rejected");
                return Err(AuthError::InvalidToken);
            }
            Err(e) => return Err(e),
        };
        decode::<UserEnvelope>(&body).map(|envelope| envelope.user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<SessionGrant, AuthError> {
        let request = self.http.post(self.url(LOGIN_PATH)).json(&LoginRequest { email, password });
        let body = send(request, LOGIN_FAILED).await?;
        decode(&body)
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let request = self.http.post(self.url(LOGOUT_PATH)).bearer_auth(token);
        send(request, LOGOUT_FAILED).await.map(drop)
    }

    async fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<(), AuthError> {
        let request = self.http.post(self.url(REGISTER_PATH)).json(&RegisterRequest { email, password, name });
        send(request, REGISTRATION_FAILED).await.map(drop)
    }

    async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let request = self.http.post(self.url(RESET_PASSWORD_PATH)).json(&ResetPasswordRequest { email });
        send(request, PASSWORD_RESET_FAILED).await.map(drop)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<User, AuthError> {
        let request = self.http.patch(self.url(PROFILE_PATH)).bearer_auth(token).json(update);
        let body = send(request, PROFILE_UPDATE_FAILED).await?;
        decode::<UserEnvelope>(&body).map(|envelope| envelope.user)
    }

    async fn refresh_token(&self, token: &str) -> Result<SessionGrant, AuthError> {
        let request = self.http.post(self.url(REFRESH_TOKEN_PATH)).bearer_auth(token);
        let body = send(request, TOKEN_REFRESH_FAILED).await?;
        decode(&body)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Send a request and return the body text of a 2xx response.
async fn send(request: reqwest::RequestBuilder, fallback: &str) -> Result<String, AuthError> {
    let response = request
        .send()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(status, error = %e, "error body unreadable");
                String::new()
            }
        };
        return Err(rejection(status, &body, fallback));
    }

    response.text().await.map_err(|e| AuthError::Transport(e.to_string()))
}

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Build a `Rejected` error, preferring a non-empty server `message`.
fn rejection(status: u16, body: &str, fallback: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_default()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_owned());
    AuthError::Rejected { status, message }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, AuthError> {
    serde_json::from_str(body).map_err(|e| AuthError::Decode(e.to_string()))
}

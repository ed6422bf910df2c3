//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::storage::DEFAULT_TOKEN_KEY;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TOKEN_PATH: &str = ".auth/session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SCROLL_COMPLETION_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the `/api/auth/*` paths are resolved against, without a trailing slash.
    pub api_base_url: String,
    /// Key the access token is stored under in the durable store.
    pub token_key: String,
    /// File backing the durable store for native callers.
    pub token_path: PathBuf,
    pub timeouts: HttpTimeouts,
    /// Upper bound on how long a smooth scroll waits for its completion signal.
    pub scroll_completion_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            token_key: DEFAULT_TOKEN_KEY.to_owned(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            timeouts: HttpTimeouts::default(),
            scroll_completion_timeout: crate::util::scroll::DEFAULT_COMPLETION_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `AUTH_API_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `AUTH_TOKEN_KEY`: default `accessToken`
    /// - `AUTH_TOKEN_PATH`: default `.auth/session.json`
    /// - `AUTH_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTH_CONNECT_TIMEOUT_SECS`: default 10
    /// - `SCROLL_COMPLETION_TIMEOUT_MS`: default 3000
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup. `from_env` delegates here.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("AUTH_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let token_key = lookup("AUTH_TOKEN_KEY")
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_owned());
        let token_path = lookup("AUTH_TOKEN_PATH").map_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH), PathBuf::from);
        let timeouts = HttpTimeouts {
            request_secs: parse_u64(&lookup, "AUTH_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(&lookup, "AUTH_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let scroll_completion_timeout = Duration::from_millis(parse_u64(
            &lookup,
            "SCROLL_COMPLETION_TIMEOUT_MS",
            DEFAULT_SCROLL_COMPLETION_TIMEOUT_MS,
        )?);

        Ok(Self { api_base_url, token_key, token_path, timeouts, scroll_completion_timeout })
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Durable single-slot storage for the access token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session container writes the token here on login/refresh and removes
//! it on logout or when validation fails. In-memory state drives rendering;
//! this slot is what survives a restart.
//!
//! Implementations:
//! - [`MemoryTokenStore`]: process-local, for tests and ephemeral sessions.
//! - [`FileTokenStore`]: JSON file keyed like `localStorage`, for native callers.
//! - `LocalStorageTokenStore` (`hydrate` feature): browser `localStorage`.

mod file;
#[cfg(feature = "hydrate")]
mod local_storage;

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;

use std::sync::Mutex;

use crate::error::AuthError;

pub use file::FileTokenStore;
#[cfg(feature = "hydrate")]
pub use local_storage::LocalStorageTokenStore;

/// Key the token is stored under unless configured otherwise.
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";

/// One string value under a fixed key. Calls are synchronous, like `localStorage`.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store cannot be read.
    fn load(&self) -> Result<Option<String>, AuthError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store cannot be written.
    fn save(&self, token: &str) -> Result<(), AuthError>;

    /// Remove the stored token. Removing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the backing store cannot be written.
    fn clear(&self) -> Result<(), AuthError>;
}

/// Token slot held in process memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if a previous run had logged in.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(token.into())) }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, AuthError> {
        self.slot
            .lock()
            .map_err(|_| AuthError::Storage("token slot lock poisoned".to_owned()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        *self.lock()? = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.lock()? = None;
        Ok(())
    }
}

//! Browser `localStorage` token store. Requires a browser environment.

use super::TokenStore;
use crate::error::AuthError;

#[derive(Debug, Clone)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl LocalStorageTokenStore {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

fn storage() -> Result<web_sys::Storage, AuthError> {
    let window = web_sys::window().ok_or_else(|| AuthError::Storage("no window".to_owned()))?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(AuthError::Storage("localStorage unavailable".to_owned())),
        Err(e) => Err(js_error(&e)),
    }
}

fn js_error(err: &wasm_bindgen::JsValue) -> AuthError {
    AuthError::Storage(format!("{err:?}"))
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        storage()?.get_item(&self.key).map_err(|e| js_error(&e))
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        storage()?.set_item(&self.key, token).map_err(|e| js_error(&e))
    }

    fn clear(&self) -> Result<(), AuthError> {
        storage()?.remove_item(&self.key).map_err(|e| js_error(&e))
    }
}

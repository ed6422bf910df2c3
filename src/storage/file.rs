//! File-backed token store.
//!
//! The file holds a flat JSON object of `key -> value` strings so several
//! stores (different keys) can share one file, the way several apps share a
//! browser's `localStorage`. Writes go to a sibling temp file first and are
//! renamed into place.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::TokenStore;
use crate::error::AuthError;

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self { path: path.into(), key: key.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(storage_error(&self.path, &e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| storage_error(&self.path, &e))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), AuthError> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_error(&self.path, &e)),
            };
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|e| storage_error(&self.path, &e))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| storage_error(&tmp, &e))?;
        fs::rename(&tmp, &self.path).map_err(|e| storage_error(&self.path, &e))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, AuthError> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    fn save(&self, token: &str) -> Result<(), AuthError> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), token.to_owned());
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), key = %self.key, "token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        tracing::debug!(path = %self.path.display(), key = %self.key, "token removed");
        Ok(())
    }
}

fn storage_error(path: &Path, err: &dyn std::fmt::Display) -> AuthError {
    AuthError::Storage(format!("{}: {err}", path.display()))
}

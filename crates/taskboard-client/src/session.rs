//! Persisted authentication state.
//!
//! Every read and write of the token pair goes through [`Session`], which
//! wraps a key/value [`SessionStore`]. The API client and the auth store
//! share one `Session` handle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use taskboard_core::AuthResponse;
use tracing::{debug, warn};

use crate::error::SessionError;

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// String key/value storage backing a [`Session`].
pub trait SessionStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    /// Returns a store-specific error when the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    /// Returns a store-specific error when the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Delete a value. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns a store-specific error when the change cannot be persisted.
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// Shared accessor for the persisted token pair.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl Session {
    /// Wrap a store.
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session kept in memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::default())
    }

    /// Current bearer token. Unreadable storage counts as logged out.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    /// Current refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Whether a bearer token is present. Validity is not checked.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// Persist both tokens from a login or refresh response.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn store_tokens(&self, tokens: &AuthResponse) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, &tokens.token)?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh_token)?;
        debug!("session tokens stored");
        Ok(())
    }

    /// Remove both tokens. Safe to call when nothing is stored.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(REFRESH_TOKEN_KEY)?;
        debug!("session tokens cleared");
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                warn!("failed to read session key {key}: {err}");
                None
            }
        }
    }
}

/// Volatile store, mostly for tests and one-shot commands.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let values = self.values.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock().map_err(|_| SessionError::Poisoned)?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock().map_err(|_| SessionError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// JSON object on disk, written with owner-only permissions.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) if data.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if values.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&self.path, perms);
        }
        Ok(())
    }

    fn modify(&self, edit: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut values = self.load()?;
        edit(&mut values);
        self.save(&values)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.modify(|values| {
            values.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.modify(|values| {
            values.remove(key);
        })
    }
}

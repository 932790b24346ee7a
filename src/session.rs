//! Credential storage for the active session.
//!
//! SYSTEM CONTEXT
//! ==============
//! The HTTP client reads the access token before every request and writes
//! after renewal; the auth service writes on login and clears on logout.
//! A store is built once at startup and shared behind `Arc<dyn SessionStore>`.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never propagate. An unreadable store reads as "no
//! credential", so the user is treated as signed out instead of crashing.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Storage key for the access token.
pub const ACCESS_KEY: &str = "accessToken";
/// Storage key for the refresh token.
pub const REFRESH_KEY: &str = "refreshToken";

/// Access/refresh credential pair issued by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Key-value storage for the current credential pair.
pub trait SessionStore: Send + Sync {
    /// Current access token, if any.
    fn access(&self) -> Option<String>;

    /// Current refresh token, if any.
    fn refresh(&self) -> Option<String>;

    /// Persist both tokens, replacing any existing pair.
    fn save(&self, pair: &TokenPair);

    /// Replace only the access token.
    fn save_access(&self, access: &str);

    /// Remove both tokens.
    fn clear(&self);
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

impl StoredTokens {
    fn from_pair(pair: &TokenPair) -> Self {
        Self { access: Some(pair.access.clone()), refresh: Some(pair.refresh.clone()) }
    }

    fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

/// Process-local store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoredTokens>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `pair`.
    #[must_use]
    pub fn with_pair(pair: &TokenPair) -> Self {
        Self { inner: Mutex::new(StoredTokens::from_pair(pair)) }
    }

    fn with_tokens<R>(&self, f: impl FnOnce(&mut StoredTokens) -> R) -> R {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl SessionStore for MemoryStore {
    fn access(&self) -> Option<String> {
        self.with_tokens(|t| t.access.clone())
    }

    fn refresh(&self) -> Option<String> {
        self.with_tokens(|t| t.refresh.clone())
    }

    fn save(&self, pair: &TokenPair) {
        self.with_tokens(|t| *t = StoredTokens::from_pair(pair));
    }

    fn save_access(&self, access: &str) {
        self.with_tokens(|t| t.access = Some(access.to_owned()));
    }

    fn clear(&self) {
        self.with_tokens(|t| *t = StoredTokens::default());
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON file store keyed like browser storage (`accessToken`, `refreshToken`).
///
/// Every read goes to disk so separate processes sharing the file observe
/// each other's writes. Writes replace the file via rename and `clear`
/// deletes it, so both tokens always change together.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoredTokens {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return StoredTokens::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return StoredTokens::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt; treating as signed out");
            StoredTokens::default()
        })
    }

    fn write(&self, tokens: &StoredTokens) {
        if tokens.is_empty() {
            self.remove();
            return;
        }
        if let Err(e) = self.write_atomic(tokens) {
            tracing::warn!(path = %self.path.display(), error = %e, "session file write failed");
        }
    }

    fn write_atomic(&self, tokens: &StoredTokens) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(tokens).map_err(std::io::Error::other)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)
    }

    fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "session file removal failed"),
        }
    }

    fn update(&self, f: impl FnOnce(&mut StoredTokens)) {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut tokens = self.load();
        f(&mut tokens);
        self.write(&tokens);
    }
}

impl SessionStore for FileStore {
    fn access(&self) -> Option<String> {
        self.load().access
    }

    fn refresh(&self) -> Option<String> {
        self.load().refresh
    }

    fn save(&self, pair: &TokenPair) {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.write(&StoredTokens::from_pair(pair));
    }

    fn save_access(&self, access: &str) {
        self.update(|t| t.access = Some(access.to_owned()));
    }

    fn clear(&self) {
        let _guard = self.lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.remove();
    }
}

// =============================================================================
// BROWSER STORE
// =============================================================================

/// Browser `localStorage` store (hydrate builds only).
///
/// Storage is looked up on every call; a missing window or blocked storage
/// reads as signed out and drops writes.
#[cfg(feature = "hydrate")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

#[cfg(feature = "hydrate")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }

    fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn write(entries: &[(&str, &str)]) {
        let Some(storage) = Self::storage() else {
            tracing::warn!("local storage unavailable; session not saved");
            return;
        };
        write_all_or_clear(entries, |k, v| storage.set_item(k, v), |k| storage.remove_item(k));
    }
}

/// Write every entry in order. On the first failure remove both token keys
/// so a stale access token is never left beside a newer refresh token.
/// Returns whether every write succeeded.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn write_all_or_clear<E: std::fmt::Debug>(
    entries: &[(&str, &str)],
    mut set: impl FnMut(&str, &str) -> Result<(), E>,
    mut remove: impl FnMut(&str) -> Result<(), E>,
) -> bool {
    let Some(err) = entries.iter().find_map(|(key, value)| set(key, value).err().map(|e| (*key, e))) else {
        return true;
    };
    tracing::warn!(key = err.0, error = ?err.1, "session storage write failed; clearing session");
    // Access first: once it is gone the session already reads as ended.
    for key in [ACCESS_KEY, REFRESH_KEY] {
        if let Err(e) = remove(key) {
            tracing::warn!(%key, error = ?e, "session storage removal failed");
        }
    }
    false
}

#[cfg(feature = "hydrate")]
impl SessionStore for LocalStorageStore {
    fn access(&self) -> Option<String> {
        Self::get(ACCESS_KEY)
    }

    fn refresh(&self) -> Option<String> {
        Self::get(REFRESH_KEY)
    }

    fn save(&self, pair: &TokenPair) {
        Self::write(&[(REFRESH_KEY, &pair.refresh), (ACCESS_KEY, &pair.access)]);
    }

    fn save_access(&self, access: &str) {
        Self::write(&[(ACCESS_KEY, access)]);
    }

    fn clear(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        // Access first: once it is gone the session already reads as ended.
        for key in [ACCESS_KEY, REFRESH_KEY] {
            if let Err(e) = storage.remove_item(key) {
                tracing::warn!(%key, error = ?e, "local storage removal failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

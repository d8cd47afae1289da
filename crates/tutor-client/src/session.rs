// Session guard: owns the auth token lifecycle
//
// The token lives behind a `TokenStore` so callers can choose between a
// process-local store and a persistent key-value file. The guard is passed
// explicitly to whoever issues authenticated calls.

use crate::error::SessionError;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Key under which the token is persisted
pub const TOKEN_KEY: &str = "token";

/// Header carrying the token on authenticated calls
pub const AUTH_HEADER: &str = "x-auth-token";

/// Opaque authentication credential issued by the backend on login
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Storage backend for the session token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthToken>, SessionError>;

    fn save(&self, token: &AuthToken) -> Result<(), SessionError>;

    /// Remove the token; removing an absent token is not an error
    fn remove(&self) -> Result<(), SessionError>;
}

/// Process-local token store
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, SessionError> {
        let token = self.token.read().map_err(|_| SessionError::Poisoned)?;
        Ok(token.clone())
    }

    fn save(&self, token: &AuthToken) -> Result<(), SessionError> {
        let mut slot = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *slot = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        let mut slot = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *slot = None;
        Ok(())
    }
}

/// Persistent key-value JSON file holding the token under [`TOKEN_KEY`].
///
/// Other keys in the file belong to other parts of the application and are
/// left untouched.
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>, SessionError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    /// Entries to rewrite on save or remove.
    ///
    /// An unparseable file is replaced rather than blocking login and logout
    /// forever; the flag reports whether that happened.
    fn entries_for_update(&self) -> Result<(Map<String, Value>, bool), SessionError> {
        match self.read_entries() {
            Ok(entries) => Ok((entries, false)),
            Err(SessionError::Corrupt(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Replacing unreadable token file: {}",
                    e
                );
                Ok((Map::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), SessionError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Write beside the target and rename so readers never see a partial file
        let raw = serde_json::to_vec_pretty(entries)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&raw)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, SessionError> {
        let _guard = self.lock.read().map_err(|_| SessionError::Poisoned)?;
        let entries = self.read_entries()?;

        Ok(entries
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(AuthToken::new))
    }

    fn save(&self, token: &AuthToken) -> Result<(), SessionError> {
        let _guard = self.lock.write().map_err(|_| SessionError::Poisoned)?;
        let (mut entries, _) = self.entries_for_update()?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.as_str().to_string()));
        self.write_entries(&entries)
    }

    fn remove(&self) -> Result<(), SessionError> {
        let _guard = self.lock.write().map_err(|_| SessionError::Poisoned)?;
        if !self.path.exists() {
            return Ok(());
        }

        let (mut entries, recovered) = self.entries_for_update()?;
        if entries.remove(TOKEN_KEY).is_some() || recovered {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Explicit session context handed to every component that talks to the
/// backend. Cloning shares the same underlying store.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_store(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Guard backed by a fresh [`MemoryTokenStore`]
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Current token, if any.
    ///
    /// An unreadable store is treated as "no token"; the backend will reject
    /// the call like any other unauthenticated request.
    pub fn get_token(&self) -> Option<AuthToken> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    pub fn set_token(&self, token: AuthToken) -> Result<(), SessionError> {
        self.store.save(&token)?;
        tracing::debug!("Session token stored");
        Ok(())
    }

    pub fn clear_token(&self) -> Result<(), SessionError> {
        self.store.remove()?;
        tracing::info!("Session token cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

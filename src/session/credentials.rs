//! Persisted sign-in state.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// What survives a restart: the bearer token and a few cached flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user_type: Option<String>,
    /// Cached user object as returned by the login call.
    pub user: Option<serde_json::Value>,
}

impl StoredSession {
    pub fn is_signed_in(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Key-value storage for the session.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<StoredSession>;

    fn save(&self, session: &StoredSession) -> Result<()>;

    /// Remove everything. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;

    /// The stored token, if any. Read failures count as "no token".
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) if session.is_signed_in() => session.token,
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored session");
                None
            }
        }
    }
}

/// Session stored as a small JSON file.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` in the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        Ok(Self::new(crate::config::data_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<StoredSession> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// In-process store; nothing touches disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<StoredSession>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(StoredSession {
                token: Some(token.into()),
                ..Default::default()
            }),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<StoredSession> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| Error::application(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| Error::application(e.to_string()))?;
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&StoredSession::default())
    }
}

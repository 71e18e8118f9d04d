//! Login session persistence.
//!
//! The access token, refresh token, and a minimal user profile survive restarts through a
//! [`SessionStore`]. The session is cleared on logout and whenever a token refresh fails.

use crate::{entities::TokenPair, errors::Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// What the client knows about the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Login name
    pub username: String,
    /// Contact address
    pub email: String,
    /// Display name
    pub name: String,
}

impl UserProfile {
    /// Profile built from the login name alone; the backend returns nothing else at login.
    #[must_use]
    pub fn from_login(username: &str) -> Self {
        Self {
            username: username.to_string(),
            email: username.to_string(),
            name: username.to_string(),
        }
    }
}

/// Tokens plus profile.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token sent with every request
    pub access: String,
    /// Token exchanged for a new access token on `401`
    pub refresh: String,
    /// Profile of the logged-in user
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Session {
    /// Session from a fresh token pair.
    #[must_use]
    pub fn new(tokens: TokenPair, user: Option<UserProfile>) -> Self {
        Self {
            access: tokens.access,
            refresh: tokens.refresh,
            user,
        }
    }

    /// Same user, rotated tokens.
    #[must_use]
    pub fn with_tokens(&self, tokens: TokenPair) -> Self {
        Self::new(tokens, self.user.clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

/// Where the session lives between requests and across restarts.
pub trait SessionStore: Send + Sync {
    /// The stored session, if any.
    fn load(&self) -> Result<Option<Session>>;
    /// Replaces the stored session.
    fn save(&self, session: &Session) -> Result<()>;
    /// Forgets the session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Session held in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Empty store, logged out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out logged in.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

/// Session kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store backed by the file at `path`. Nothing is read until the first load.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the session file lives.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // A damaged file just means logging in again
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Session file {} removed", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn session() -> Session {
        Session::new(
            TokenPair {
                access: "access-1".to_string(),
                refresh: "refresh-1".to_string(),
            },
            Some(UserProfile::from_login("ada")),
        )
    }

    #[test]
    fn test_memory_store_round_trip() -> Result<()> {
        let store = MemorySessionStore::new();
        assert!(store.load()?.is_none());
        store.save(&session())?;
        assert_eq!(store.load()?, Some(session()));
        store.clear()?;
        assert!(store.load()?.is_none());
        Ok(())
    }

    #[test]
    fn test_file_store_persists_across_instances() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).save(&session())?;
        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load()?, Some(session()));

        reopened.clear()?;
        assert!(!path.exists());
        // Clearing twice is fine
        reopened.clear()?;
        Ok(())
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json")?;
        assert!(FileSessionStore::new(&path).load()?.is_none());
        Ok(())
    }

    #[test]
    fn test_with_tokens_keeps_user() {
        let rotated = session().with_tokens(TokenPair {
            access: "access-2".to_string(),
            refresh: "refresh-2".to_string(),
        });
        assert_eq!(rotated.access, "access-2");
        assert_eq!(rotated.user.unwrap().username, "ada");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let printed = format!("{:?}", session());
        assert!(!printed.contains("access-1"));
        assert!(!printed.contains("refresh-1"));
    }
}

//! Session store - the persisted proof-of-login
//!
//! A session is a plaintext `{username, role}` pair written after a
//! successful login and trusted until logout clears it. Both fields are
//! always written together and cleared together; readers never observe one
//! without the other.
//!
//! The store is injected as [`SharedSession`] into every component that
//! needs it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Account role as the dashboard understands it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    /// The service sent no role, or one we do not recognise
    #[default]
    #[serde(rename = "")]
    Unassigned,
}

impl Role {
    /// Normalise the role label returned by the login endpoint
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Role::Admin,
            "client" | "standard client" => Role::Client,
            other => {
                if !other.is_empty() {
                    tracing::debug!("Unrecognised role label '{}'", label);
                }
                Role::Unassigned
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Unassigned => "",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

/// Storage for the current session
pub trait SessionStore: Send + Sync {
    /// Current session, or `None` if never set or cleared
    fn get(&self) -> Option<Session>;

    /// Persist both fields in one step
    fn set(&self, username: &str, role: Role);

    /// Remove both fields
    fn clear(&self);
}

/// Session store handle shared across components
pub type SharedSession = Arc<dyn SessionStore>;

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Session store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a session
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, username: &str, role: Role) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Session::new(username, role));
    }

    fn clear(&self) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk layout of the session file. Both keys are optional so a
/// hand-edited file with one key missing reads as "no session".
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

/// Session store persisted as a small TOML file
///
/// Survives restarts. Writes go to a temporary sibling and are renamed into
/// place, so other processes see either the old file or the new one. The
/// mutex serialises access within this process.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Default location: ~/.config/logstream/session.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("logstream").join("session.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Option<Session> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Cannot read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        let file: SessionFile = match toml::from_str(&contents) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Ignoring unparsable session file: {}", e);
                return None;
            }
        };

        match (file.username, file.role) {
            (Some(username), Some(role)) if !username.is_empty() => {
                Some(Session { username, role })
            }
            _ => None,
        }
    }

    fn write(&self, file: &SessionFile) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string(file)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read()
    }

    fn set(&self, username: &str, role: Role) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let file = SessionFile {
            username: Some(username.to_string()),
            role: Some(role),
        };
        if let Err(e) = self.write(&file) {
            tracing::error!("Failed to persist session: {}", e);
        } else {
            tracing::debug!("Session stored for '{}'", username);
        }
    }

    fn clear(&self) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Session cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                // Could not delete: blank it so it reads as absent
                tracing::warn!("Failed to remove session file: {}", e);
                if let Err(e) = self.write(&SessionFile::default()) {
                    tracing::error!("Failed to blank session file: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_role_labels_normalised() {
        assert_eq!(Role::from_label("admin"), Role::Admin);
        assert_eq!(Role::from_label("Administrator"), Role::Admin);
        assert_eq!(Role::from_label("Standard Client"), Role::Client);
        assert_eq!(Role::from_label(""), Role::Unassigned);
        assert_eq!(Role::from_label("auditor"), Role::Unassigned);
    }

    #[test]
    fn test_memory_store_set_get_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(), None);

        store.set("admin", Role::Admin);
        assert_eq!(store.get(), Some(Session::new("admin", Role::Admin)));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.toml");

        FileSessionStore::new(&path).set("client_user", Role::Client);

        // A fresh store over the same file simulates a restart
        let reopened = FileSessionStore::new(&path);
        assert_eq!(
            reopened.get(),
            Some(Session::new("client_user", Role::Client))
        );

        reopened.clear();
        assert_eq!(FileSessionStore::new(&path).get(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_unassigned_role_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.toml"));

        store.set("guest", Role::Unassigned);
        assert_eq!(store.get(), Some(Session::new("guest", Role::Unassigned)));
    }

    #[test]
    fn test_file_store_half_written_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");

        std::fs::write(&path, "username = \"admin\"\n").unwrap();
        assert_eq!(FileSessionStore::new(&path).get(), None);

        std::fs::write(&path, "role = \"admin\"\n").unwrap();
        assert_eq!(FileSessionStore::new(&path).get(), None);

        std::fs::write(&path, "not toml at all [[[").unwrap();
        assert_eq!(FileSessionStore::new(&path).get(), None);
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSessionStore::new(dir.path().join("session.toml")));

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    if i % 2 == 0 {
                        store.set("admin", Role::Admin);
                    } else {
                        store.set("client_user", Role::Client);
                    }
                }
                store.clear();
            })
        };

        for _ in 0..200 {
            if let Some(session) = store.get() {
                let consistent = (session.username == "admin" && session.role == Role::Admin)
                    || (session.username == "client_user" && session.role == Role::Client);
                assert!(consistent, "partial session observed: {:?}", session);
            }
        }

        writer.join().unwrap();
        assert_eq!(store.get(), None);
    }
}

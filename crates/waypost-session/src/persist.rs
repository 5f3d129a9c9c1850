//! Credential persistence: surviving a process restart.
//!
//! The session's credential is the only piece of state that outlives the
//! process — the profile is always re-hydrated fresh. The store is a
//! single string-valued record with three operations, abstracted behind
//! the [`CredentialStore`] trait so that:
//!
//! - production uses [`FileCredentialStore`] (a small JSON file)
//! - tests use [`MemoryCredentialStore`]
//!
//! The trait is object-safe and synchronous: the record is tiny and only
//! touched on login/logout/startup, so blocking file I/O is acceptable.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::PersistError;

/// Reads and writes the persisted credential record.
pub trait CredentialStore: Send + Sync + 'static {
    /// Loads the persisted token, if any.
    ///
    /// A missing record is `Ok(None)`, not an error — first launch has
    /// nothing persisted.
    fn load(&self) -> Result<Option<String>, PersistError>;

    /// Persists the given token, replacing any previous record.
    fn store(&self, token: &str) -> Result<(), PersistError>;

    /// Removes the persisted record. A no-op if nothing is persisted.
    fn clear(&self) -> Result<(), PersistError>;
}

/// On-disk shape of the persisted record.
///
/// Wrapped in a struct (rather than a bare string) so the file stays
/// extensible if more session state ever needs to survive a restart.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    token: String,
}

/// A [`CredentialStore`] backed by a JSON file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store backed by the given file path. The file does not
    /// need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(PersistError::Io(e)),
        };
        let record: PersistedSession = serde_json::from_slice(&bytes)?;
        Ok(Some(record.token))
    }

    fn store(&self, token: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = PersistedSession {
            token: token.to_string(),
        };
        let bytes = serde_json::to_vec(&record)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            // Already gone — clear is idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Io(e)),
        }
    }
}

/// An in-memory [`CredentialStore`] for tests and development.
///
/// Nothing actually survives a restart, but it lets the rest of the
/// session machinery run unmodified.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a token, as if a previous run
    /// had persisted it.
    pub fn seeded(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(self.token.lock().expect("poisoned").clone())
    }

    fn store(&self, token: &str) -> Result<(), PersistError> {
        *self.token.lock().expect("poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        *self.token.lock().expect("poisoned") = None;
        Ok(())
    }
}

//! Credential storage and the session gate.
//!
//! The backend hands the client an opaque token on login/registration. The
//! gate treats the *presence* of that marker as proof of authentication - no
//! expiry or signature check happens client-side. Staleness is only ever
//! discovered when a protected call comes back with an authorization error.

use std::fs::{self, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::error::{Error, Result};

/// Storage for the session credential marker.
///
/// Injectable so the gate and the API client can be exercised without a real
/// on-disk token file.
pub trait CredentialStore: Send + Sync {
    /// Current credential marker, if any
    fn get(&self) -> Option<String>;

    /// Persist a new credential marker
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the credential marker
    fn clear(&self) -> Result<()>;
}

/// Token file on disk, written with restricted permissions (0600)
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim().to_string();
                if token.is_empty() { None } else { Some(token) }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read credential file: {}", e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        fs::set_permissions(&self.path, Permissions::from_mode(0o600))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and embedded use
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| Error::Other("Credential store lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| Error::Other("Credential store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Routing-level authentication check over a credential store.
///
/// Two states: anonymous and presumed-authenticated. `establish` transitions
/// forward on a successful login/registration response, `logout` transitions
/// back. There is no automatic transition on credential expiry.
#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn CredentialStore>,
}

impl SessionGate {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// True when a credential marker is present. Marker validity is never
    /// inspected.
    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Persist the credential returned by login/registration.
    pub fn establish(&self, token: &str) -> Result<()> {
        self.store.set(token)
    }

    /// Clear the credential marker.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()
    }

    /// Error out unless a credential marker is present.
    pub fn require_authenticated(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::MissingAuth)
        }
    }
}

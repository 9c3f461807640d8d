// Management credentials
//
// Credentials are owned outside the core and may appear, change, or
// disappear at runtime. Every transport reads the current value per call
// through a shared `CredentialStore`, so an update takes effect on the
// next command without rebuilding clients.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::SecretString;

use crate::error::Error;

/// Host, username, and secret for the management controller.
#[derive(Clone)]
pub struct ManagementCredentials {
    /// Hostname or IP of the management controller (no scheme).
    pub host: String,
    pub username: String,
    pub secret: SecretString,
}

impl ManagementCredentials {
    pub fn new(host: impl Into<String>, username: impl Into<String>, secret: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            secret,
        }
    }
}

impl fmt::Debug for ManagementCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Shared, swappable holder for the current credentials.
///
/// Cheaply cloneable; all clones observe the same value. Absence is a
/// first-class state ("not configured"), distinct from "unreachable".
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<ArcSwapOption<ManagementCredentials>>,
}

impl CredentialStore {
    /// An empty store (not configured).
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `credentials`.
    pub fn with(credentials: ManagementCredentials) -> Self {
        let store = Self::new();
        store.set(credentials);
        store
    }

    pub fn set(&self, credentials: ManagementCredentials) {
        self.inner.store(Some(Arc::new(credentials)));
    }

    pub fn clear(&self) {
        self.inner.store(None);
    }

    pub fn is_configured(&self) -> bool {
        self.inner.load().is_some()
    }

    /// The current credentials, or [`Error::NotConfigured`].
    pub fn current(&self) -> Result<Arc<ManagementCredentials>, Error> {
        self.inner.load_full().ok_or(Error::NotConfigured)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("configured", &self.is_configured())
            .finish()
    }
}

//! Identity provider for dmail sessions.
//!
//! A session is authenticated when a PEM identity is configured and loads.
//! Without one the client stays signed out, which is not an error.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use candid::Principal;
use ic_agent::identity::{AnonymousIdentity, BasicIdentity, Secp256k1Identity};

use crate::config::IdentityConfig;
use crate::{DmailError, Result};

/// Credential used to sign outgoing canister calls.
#[derive(Clone)]
pub struct Identity {
    inner: Arc<dyn ic_agent::Identity>,
}

impl Identity {
    /// Wrap an `ic-agent` identity.
    pub fn new<I: ic_agent::Identity + 'static>(identity: I) -> Self {
        Self {
            inner: Arc::new(identity),
        }
    }

    /// The anonymous principal.
    pub fn anonymous() -> Self {
        Self::new(AnonymousIdentity)
    }

    /// Load a PEM identity, accepting ed25519 and secp256k1 keys.
    pub fn from_pem_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        std::fs::metadata(path)?;

        match BasicIdentity::from_pem_file(path) {
            Ok(identity) => Ok(Self::new(identity)),
            Err(ed25519_err) => match Secp256k1Identity::from_pem_file(path) {
                Ok(identity) => Ok(Self::new(identity)),
                Err(secp_err) => Err(DmailError::Identity(format!(
                    "{} is neither an ed25519 ({ed25519_err}) nor a secp256k1 ({secp_err}) key",
                    path.display()
                ))),
            },
        }
    }

    /// Principal the identity signs as.
    pub fn principal(&self) -> Result<Principal> {
        self.inner.sender().map_err(DmailError::Identity)
    }

    pub(crate) fn to_agent_identity(&self) -> Arc<dyn ic_agent::Identity> {
        self.inner.clone()
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.principal() {
            Ok(p) => f.debug_tuple("Identity").field(&p.to_text()).finish(),
            Err(_) => f.write_str("Identity(<unknown>)"),
        }
    }
}

/// Source of the session identity.
pub trait IdentityProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// The signed-in identity, `None` when signed out.
    fn identity(&self) -> Option<Identity>;
}

/// Identity provider backed by a PEM file on disk.
#[derive(Debug, Clone, Default)]
pub struct AuthClient {
    identity: Option<Identity>,
}

impl AuthClient {
    /// Create the client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a PEM file is configured but cannot be read or
    /// parsed.
    pub fn create(config: &IdentityConfig) -> Result<Self> {
        let Some(path) = config.pem_file.as_deref() else {
            tracing::info!("No identity configured, starting signed out");
            return Ok(Self::default());
        };

        let identity = Identity::from_pem_file(path)?;
        tracing::info!(principal = ?identity, "Loaded identity");
        Ok(Self {
            identity: Some(identity),
        })
    }

    /// A client signed in as `identity`.
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// A signed-out client.
    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl IdentityProvider for AuthClient {
    fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    fn identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

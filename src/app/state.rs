//! Session-wide mail storage handle.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::sdk::MailStorage;

/// Holds the mail storage resolved for the current session.
///
/// Starts empty, is set once after a successful registry lookup, and is read
/// by every view afterwards. Clones share the same slot.
#[derive(Clone, Default)]
pub struct StorageSlot {
    inner: Arc<RwLock<Option<MailStorage>>>,
}

impl StorageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the session's mail storage.
    ///
    /// Returns `false` and keeps the existing handle if one is already set.
    pub async fn set(&self, storage: MailStorage) -> bool {
        let mut slot = self.inner.write().await;
        if let Some(existing) = slot.as_ref() {
            tracing::warn!(
                existing = %existing.canister_id(),
                rejected = %storage.canister_id(),
                "mail storage already set for this session"
            );
            return false;
        }
        *slot = Some(storage);
        true
    }

    /// The session's mail storage, if resolved.
    pub async fn get(&self) -> Option<MailStorage> {
        self.inner.read().await.clone()
    }

    pub async fn is_set(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// End the session, dropping the stored handle.
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

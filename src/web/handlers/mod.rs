//! API handlers for the webmail.

pub mod compose;
pub mod inbox;
pub mod mail;

pub use compose::*;
pub use inbox::*;
pub use mail::*;

use std::sync::Arc;

use candid::Principal;
use tokio::sync::Mutex;

use crate::actor::ActorFactory;
use crate::app::{InboxFlow, StorageSlot};
use crate::auth::IdentityProvider;
use crate::sdk::MailStorage;
use crate::web::error::ApiError;
use crate::DmailError;

/// Shared state of one webmail session.
pub struct AppState {
    pub auth: Arc<dyn IdentityProvider>,
    /// Mail storage resolved by the inbox flow, read by every other view.
    pub slot: StorageSlot,
    pub inbox: Mutex<InboxFlow>,
}

impl AppState {
    pub fn new(
        auth: Arc<dyn IdentityProvider>,
        factory: Arc<dyn ActorFactory>,
        registry_id: Principal,
    ) -> Self {
        let slot = StorageSlot::new();
        let inbox = InboxFlow::new(auth.clone(), factory, registry_id, slot.clone());
        Self {
            auth,
            slot,
            inbox: Mutex::new(inbox),
        }
    }

    /// The session's mail storage.
    ///
    /// Fails with 401 when signed out and 503 until the inbox has resolved
    /// the storage.
    pub async fn storage(&self) -> Result<MailStorage, ApiError> {
        self.require_auth()?;
        self.slot
            .get()
            .await
            .ok_or_else(|| DmailError::StorageUnavailable.into())
    }

    pub fn require_auth(&self) -> Result<(), ApiError> {
        if self.auth.is_authenticated() {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Sign in to access your mail"))
        }
    }
}

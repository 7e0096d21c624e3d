//! Inbox flow: resolve the user's mail storage and load a page of mail.

use std::collections::HashSet;
use std::sync::Arc;

use candid::Principal;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::actor::ActorFactory;
use crate::auth::IdentityProvider;
use crate::sdk::{MailRegistry, MailStorage};
use crate::types::{timestamp_to_datetime, MailRecord};
use crate::DmailError;

use super::notify::Notifier;
use super::state::StorageSlot;

/// Inbox entry as rendered by a frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMail {
    pub id: String,
    /// Sender display name, falling back to the sender address.
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub text: String,
    /// Canister timestamp in nanoseconds.
    pub date: u64,
    pub read: bool,
    pub content_type: Option<String>,
    pub labels: Vec<String>,
}

impl DisplayMail {
    /// The timestamp as a UTC date-time.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.date)
    }
}

impl From<&MailRecord> for DisplayMail {
    fn from(record: &MailRecord) -> Self {
        let header = &record.header;
        Self {
            id: record.mail_id.clone(),
            name: header
                .sender_name
                .clone()
                .unwrap_or_else(|| header.from.clone()),
            email: header.from.clone(),
            subject: header.subject.clone(),
            text: record.content_text().unwrap_or_default(),
            date: header.timestamp,
            read: record.read,
            content_type: header.content_type.clone(),
            labels: Vec::new(),
        }
    }
}

/// Map a fetched page to display entries, dropping repeated mail ids.
pub fn to_display_mails(records: &[MailRecord]) -> Vec<DisplayMail> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| {
            let fresh = seen.insert(r.mail_id.as_str());
            if !fresh {
                tracing::warn!(mail_id = %r.mail_id, "duplicate mail id in inbox page");
            }
            fresh
        })
        .map(DisplayMail::from)
        .collect()
}

/// Where the inbox flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InboxState {
    /// No signed-in identity. Not an error.
    Unauthenticated,
    /// Waiting for the registry to resolve the user's storage.
    ResolvingUser,
    /// Waiting for the storage canister to return the inbox.
    FetchingMail,
    Ready { mails: Vec<DisplayMail> },
    /// The last attempt failed. Nothing is retried automatically.
    Error { message: String },
}

impl InboxState {
    pub fn is_ready(&self) -> bool {
        matches!(self, InboxState::Ready { .. })
    }

    /// Mails of a ready inbox, empty otherwise.
    pub fn mails(&self) -> &[DisplayMail] {
        match self {
            InboxState::Ready { mails } => mails,
            _ => &[],
        }
    }
}

/// Drives the inbox from sign-in to a rendered page of mail.
pub struct InboxFlow {
    auth: Arc<dyn IdentityProvider>,
    factory: Arc<dyn ActorFactory>,
    registry_id: Principal,
    slot: StorageSlot,
    state: InboxState,
}

impl InboxFlow {
    pub fn new(
        auth: Arc<dyn IdentityProvider>,
        factory: Arc<dyn ActorFactory>,
        registry_id: Principal,
        slot: StorageSlot,
    ) -> Self {
        Self {
            auth,
            factory,
            registry_id,
            slot,
            state: InboxState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &InboxState {
        &self.state
    }

    /// Slot the resolved storage is written to.
    pub fn slot(&self) -> &StorageSlot {
        &self.slot
    }

    /// Load a page of the inbox.
    ///
    /// Signed out, the flow stays `Unauthenticated`. Otherwise the storage is
    /// resolved through the registry unless this session already holds one,
    /// then the page is fetched. Failures are notified and end in `Error`.
    pub async fn load(&mut self, page: Option<u64>, notifier: &dyn Notifier) -> &InboxState {
        if !self.auth.is_authenticated() {
            tracing::debug!("inbox load skipped, not signed in");
            self.state = InboxState::Unauthenticated;
            return &self.state;
        }

        let storage = match self.slot.get().await {
            Some(storage) => storage,
            None => match self.resolve_storage(notifier).await {
                Some(storage) => storage,
                None => return &self.state,
            },
        };

        self.state = InboxState::FetchingMail;
        match storage.get_mails(page).await {
            Ok(records) => {
                let mails = to_display_mails(&records);
                tracing::info!(count = mails.len(), ?page, "inbox ready");
                self.state = InboxState::Ready { mails };
            }
            Err(e) => self.fail("Could not fetch your mail", e, notifier),
        }

        &self.state
    }

    async fn resolve_storage(&mut self, notifier: &dyn Notifier) -> Option<MailStorage> {
        self.state = InboxState::ResolvingUser;
        let identity = self.auth.identity();

        let registry =
            match MailRegistry::new(self.factory.as_ref(), self.registry_id, identity.as_ref()) {
                Ok(registry) => registry,
                Err(e) => {
                    self.fail("Could not reach the mail registry", e, notifier);
                    return None;
                }
            };

        let address = match registry.lookup_user().await {
            Ok(address) => address,
            Err(e) => {
                self.fail("Could not look up your mailbox", e, notifier);
                return None;
            }
        };

        let storage = match MailStorage::new(self.factory.as_ref(), address, identity.as_ref()) {
            Ok(storage) => storage,
            Err(e) => {
                self.fail("Could not open your mailbox", e, notifier);
                return None;
            }
        };

        tracing::info!(storage = %address, "resolved mail storage");
        if self.slot.set(storage.clone()).await {
            return Some(storage);
        }
        // Another view resolved the session first; follow the stored handle.
        Some(self.slot.get().await.unwrap_or(storage))
    }

    fn fail(&mut self, context: &str, error: DmailError, notifier: &dyn Notifier) {
        if error.is_backend() {
            tracing::warn!(error = %error, "{context}");
        } else {
            tracing::error!(error = %error, "{context}");
        }
        let message = format!("{context}: {}", error.to_notice());
        notifier.error(&message);
        self.state = InboxState::Error { message };
    }
}

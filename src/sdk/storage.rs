//! Mail storage client.

use std::sync::Arc;

use candid::Principal;
use serde::Serialize;

use crate::actor::{self, Actor, ActorFactory, CallKind};
use crate::auth::Identity;
use crate::types::{EmailAddress, Mail, MailError, MailRecord, Receipt};
use crate::Result;

/// Read/unread totals for the caller's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MailCount {
    pub unread: u32,
    pub read: u32,
}

/// Client for a user's personal mail storage canister.
#[derive(Clone)]
pub struct MailStorage {
    actor: Arc<dyn Actor>,
}

impl MailStorage {
    /// Bind a storage client to `canister_id`, signing as `identity`.
    pub fn new(
        factory: &dyn ActorFactory,
        canister_id: Principal,
        identity: Option<&Identity>,
    ) -> Result<Self> {
        Ok(Self::from_actor(factory.create_actor(canister_id, identity)?))
    }

    pub fn from_actor(actor: Arc<dyn Actor>) -> Self {
        Self { actor }
    }

    pub fn canister_id(&self) -> Principal {
        self.actor.canister_id()
    }

    /// The underlying actor, for calls not wrapped here.
    pub fn actor(&self) -> &Arc<dyn Actor> {
        &self.actor
    }

    /// Fetch one page (50 entries) of the inbox. `None` asks the canister for
    /// its default (first) page and is sent as an absent optional, not as zero.
    pub async fn get_mails(&self, page: Option<u64>) -> Result<Vec<MailRecord>> {
        let reply: std::result::Result<Vec<MailRecord>, MailError> =
            actor::call(self.actor.as_ref(), CallKind::Query, "get_mails", (page,)).await?;
        let records = reply?;
        tracing::debug!(
            storage = %self.canister_id(),
            ?page,
            count = records.len(),
            "fetched inbox page"
        );
        Ok(records)
    }

    /// Fetch a full mail. The canister marks it read, so this is an update
    /// call.
    pub async fn fetch_mail(&self, id: &str) -> Result<Mail> {
        let reply: std::result::Result<Mail, MailError> =
            actor::call(self.actor.as_ref(), CallKind::Update, "get_mail", (id,)).await?;
        Ok(reply?)
    }

    /// Submit a composed mail. Nothing is retried or kept locally: a failed
    /// send has to be resubmitted in full.
    pub async fn send_mail(&self, mail: &Mail) -> Result<Receipt> {
        let reply: std::result::Result<Receipt, MailError> =
            actor::call(self.actor.as_ref(), CallKind::Update, "send_mail", (mail,)).await?;
        reply?;
        tracing::info!(
            storage = %self.canister_id(),
            recipients = mail.header.recipients().count(),
            "mail submitted"
        );
        Ok(())
    }

    /// Unread and read totals for the caller's inbox.
    pub async fn get_mail_count(&self) -> Result<MailCount> {
        let reply: std::result::Result<(u32, u32), MailError> =
            actor::call(self.actor.as_ref(), CallKind::Query, "get_mail_count", ()).await?;
        let (unread, read) = reply?;
        Ok(MailCount { unread, read })
    }

    /// Move a mail from the inbox to the trash.
    pub async fn delete_mail(&self, id: &str) -> Result<()> {
        let reply: std::result::Result<(), MailError> =
            actor::call(self.actor.as_ref(), CallKind::Update, "delete_mail", (id,)).await?;
        Ok(reply?)
    }

    /// Move a mail from the trash back to the inbox.
    pub async fn restore_mail(&self, id: &str) -> Result<()> {
        let reply: std::result::Result<(), MailError> =
            actor::call(self.actor.as_ref(), CallKind::Update, "restore_mail", (id,)).await?;
        Ok(reply?)
    }

    /// Mail domain served by this storage canister.
    pub async fn get_domain_name(&self) -> Result<String> {
        actor::call(self.actor.as_ref(), CallKind::Query, "get_domain_name", ()).await
    }

    /// Addresses registered on this storage canister.
    pub async fn get_users(&self) -> Result<Vec<EmailAddress>> {
        let reply: std::result::Result<Vec<EmailAddress>, MailError> =
            actor::call(self.actor.as_ref(), CallKind::Query, "get_users", ()).await?;
        Ok(reply?)
    }
}

//! Compose flow: collect a draft and submit it through the session storage.

use serde::Serialize;
use serde_bytes::ByteBuf;
use validator::ValidateEmail;

use crate::types::{Mail, MailHeader, Receipt};
use crate::{DmailError, Result};

use super::notify::Notifier;
use super::state::StorageSlot;

/// Content type of every composed mail.
pub const PLAIN_TEXT: &str = "text/plain";

/// Longest address accepted as a recipient.
pub const MAX_ADDRESS_LEN: usize = 254;

/// A recipient on the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub email: String,
    /// End-to-end encryption for this recipient. Never negotiated yet.
    pub e2e: Option<bool>,
}

/// An attachment picked for the draft. Kept locally and never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
}

/// Whether `address` is acceptable as a recipient.
pub fn is_valid_address(address: &str) -> bool {
    !address.is_empty()
        && address.len() <= MAX_ADDRESS_LEN
        && address.to_string().validate_email()
}

/// A mail being composed.
#[derive(Debug, Clone, Default)]
pub struct ComposeDraft {
    recipients: Vec<Recipient>,
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
    sending: bool,
}

impl ComposeDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a recipient.
    ///
    /// Invalid and repeated addresses are dropped without an error. Returns
    /// whether the address was added.
    pub fn add_recipient(&mut self, address: &str) -> bool {
        let address = address.trim();
        if !is_valid_address(address) {
            tracing::debug!(address, "rejected recipient");
            return false;
        }
        if self.recipients.iter().any(|r| r.email == address) {
            return false;
        }
        self.recipients.push(Recipient {
            email: address.to_string(),
            e2e: None,
        });
        true
    }

    /// Remove the recipient at `index`. Out of range is a no-op.
    pub fn remove_recipient(&mut self, index: usize) -> Option<Recipient> {
        (index < self.recipients.len()).then(|| self.recipients.remove(index))
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Whether a submission is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// The mail this draft submits.
    ///
    /// Sender, sender name and timestamp are left for the canister to fill
    /// in. Attachments are not included.
    pub fn build_mail(&self) -> Mail {
        let subject = Some(self.subject.clone()).filter(|s| !s.is_empty());
        Mail {
            correlation_id: None,
            header: MailHeader {
                from: String::new(),
                timestamp: 0,
                content_type: Some(PLAIN_TEXT.to_string()),
                to: self.recipients.iter().map(|r| r.email.clone()).collect(),
                subject,
                sender_name: None,
                ..Default::default()
            },
            body: ByteBuf::from(self.body.as_bytes().to_vec()),
            reply_messages: None,
        }
    }

    /// Send the draft through the session's mail storage.
    ///
    /// Without a resolved storage nothing is sent. Outcomes are reported to
    /// `notifier`; the inbox is not refreshed. The draft is kept either way
    /// so a failed send can be resubmitted.
    pub async fn submit(&mut self, slot: &StorageSlot, notifier: &dyn Notifier) -> Result<Receipt> {
        let Some(storage) = slot.get().await else {
            tracing::warn!("compose submitted before mail storage was resolved");
            let error = DmailError::StorageUnavailable;
            notifier.error(&error.to_string());
            return Err(error);
        };

        if self.recipients.is_empty() {
            tracing::debug!("submitting mail without recipients");
        }

        if !self.attachments.is_empty() {
            tracing::debug!(
                count = self.attachments.len(),
                "attachments stay local and are not sent"
            );
        }

        let mail = self.build_mail();
        self.sending = true;
        let result = storage.send_mail(&mail).await;
        self.sending = false;

        match result {
            Ok(receipt) => {
                notifier.success("Mail sent");
                Ok(receipt)
            }
            Err(e) => {
                if e.is_backend() {
                    tracing::warn!(error = %e, "send_mail rejected");
                } else {
                    tracing::error!(error = %e, "send_mail failed");
                }
                notifier.error(&e.to_notice());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{MemoryActor, MemoryActorFactory};
    use crate::app::{NotificationLevel, NotificationLog};
    use crate::sdk::MailStorage;
    use crate::types::MailError;
    use candid::Principal;
    use std::sync::Arc;

    const STORAGE: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";

    async fn slot_with_actor() -> (StorageSlot, Arc<MemoryActor>) {
        let factory = MemoryActorFactory::new();
        let id = Principal::from_text(STORAGE).unwrap();
        let actor = factory.actor(id);
        let slot = StorageSlot::new();
        slot.set(MailStorage::new(&factory, id, None).unwrap()).await;
        (slot, actor)
    }

    #[test]
    fn test_add_recipient_validates() {
        let mut draft = ComposeDraft::new();
        assert!(!draft.add_recipient("not-an-email"));
        assert!(!draft.add_recipient(""));
        assert!(draft.add_recipient("  b@x.com "));
        assert_eq!(draft.recipients().len(), 1);
        assert_eq!(draft.recipients()[0].email, "b@x.com");
        assert_eq!(draft.recipients()[0].e2e, None);
    }

    #[test]
    fn test_add_recipient_ignores_duplicates() {
        let mut draft = ComposeDraft::new();
        assert!(draft.add_recipient("b@x.com"));
        assert!(!draft.add_recipient("b@x.com"));
        assert_eq!(draft.recipients().len(), 1);
    }

    #[test]
    fn test_overlong_address_rejected() {
        let mut draft = ComposeDraft::new();
        let address = format!("{}@x.com", "a".repeat(250));
        assert!(!draft.add_recipient(&address));
    }

    #[test]
    fn test_remove_recipient() {
        let mut draft = ComposeDraft::new();
        draft.add_recipient("a@x.com");
        draft.add_recipient("b@x.com");

        assert!(draft.remove_recipient(5).is_none());
        let removed = draft.remove_recipient(0).unwrap();
        assert_eq!(removed.email, "a@x.com");
        assert_eq!(draft.recipients()[0].email, "b@x.com");
    }

    #[test]
    fn test_build_mail() {
        let mut draft = ComposeDraft::new();
        draft.add_recipient("b@x.com");
        draft.set_body("hi");
        draft.add_attachment(Attachment {
            name: "notes.txt".to_string(),
            size: 12,
        });

        let mail = draft.build_mail();
        assert_eq!(mail.header.from, "");
        assert_eq!(mail.header.sender_name, None);
        assert_eq!(mail.header.to, vec!["b@x.com"]);
        assert_eq!(mail.header.subject, None);
        assert_eq!(mail.header.content_type.as_deref(), Some(PLAIN_TEXT));
        assert_eq!(mail.header.timestamp, 0);
        assert_eq!(mail.body.as_ref(), b"hi");
    }

    #[test]
    fn test_build_mail_keeps_subject() {
        let mut draft = ComposeDraft::new();
        draft.set_subject("Lunch");
        assert_eq!(draft.build_mail().header.subject.as_deref(), Some("Lunch"));
    }

    #[tokio::test]
    async fn test_submit_without_storage_sends_nothing() {
        let mut draft = ComposeDraft::new();
        draft.add_recipient("b@x.com");
        let log = NotificationLog::new();

        let result = draft.submit(&StorageSlot::new(), &log).await;
        assert!(matches!(result, Err(DmailError::StorageUnavailable)));
        assert!(log.has_errors());
        assert!(!draft.is_sending());
    }

    #[tokio::test]
    async fn test_submit_success() {
        let (slot, actor) = slot_with_actor().await;
        actor.reply("send_mail", Ok::<(), MailError>(()));

        let mut draft = ComposeDraft::new();
        draft.add_recipient("b@x.com");
        draft.set_body("hi");
        let log = NotificationLog::new();

        draft.submit(&slot, &log).await.unwrap();

        let calls = actor.calls_to("send_mail");
        assert_eq!(calls.len(), 1);
        let (sent,): (Mail,) = candid::decode_args(&calls[0].args).unwrap();
        assert_eq!(sent, draft.build_mail());

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level, NotificationLevel::Success);
        assert!(actor.calls_to("get_mails").is_empty());
    }

    #[tokio::test]
    async fn test_submit_error_is_notified() {
        let (slot, actor) = slot_with_actor().await;
        actor.reply(
            "send_mail",
            Err::<(), MailError>(MailError::GeneralError("quota".to_string())),
        );

        let mut draft = ComposeDraft::new();
        draft.add_recipient("b@x.com");
        let log = NotificationLog::new();

        let result = draft.submit(&slot, &log).await;
        assert!(matches!(result, Err(DmailError::Mail(_))));
        let entries = log.entries();
        assert_eq!(entries[0].level, NotificationLevel::Error);
        assert!(entries[0].message.contains("GeneralError"));
        assert_eq!(draft.recipients().len(), 1);
    }
}

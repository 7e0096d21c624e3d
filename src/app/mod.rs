//! Webmail application layer: shared session state, notifications, and the
//! inbox and compose flows that frontends drive.

pub mod compose;
pub mod inbox;
pub mod notify;
pub mod state;

pub use compose::{Attachment, ComposeDraft, Recipient, MAX_ADDRESS_LEN, PLAIN_TEXT};
pub use inbox::{DisplayMail, InboxFlow, InboxState};
pub use notify::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use state::StorageSlot;

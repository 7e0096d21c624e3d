//! Candid wire types shared with the mail canisters.
//!
//! Field names follow the canister interface, so a record decoded from a
//! replica reply maps one to one onto these structs.

mod errors;
mod mail;

pub use errors::{MailError, RegistryError};
pub use mail::{
    timestamp_to_datetime, Mail, MailHeader, MailRecord, MailReply, Receipt, SenderChannel,
};

/// Mail identifier assigned by the storage canister.
pub type MailId = String;

/// Plain email address text.
pub type EmailAddress = String;

//! dmail - mail client SDK and webmail for canister hosted mailboxes.
//!
//! A user's mail lives in a personal storage canister. The registry canister
//! maps the signed-in principal to that storage; the inbox and compose flows
//! in [`app`] talk to both through the typed wrappers in [`sdk`].

pub mod actor;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod sdk;
pub mod types;
pub mod web;

pub use app::{ComposeDraft, InboxFlow, InboxState, StorageSlot};
pub use auth::{AuthClient, Identity, IdentityProvider};
pub use config::Config;
pub use error::{DmailError, Result};
pub use sdk::{MailRegistry, MailStorage};

//! SDK wrappers over the registry and mail storage canisters.

mod registry;
mod storage;

pub use registry::MailRegistry;
pub use storage::{MailCount, MailStorage};

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use candid::Principal;
use serde_bytes::ByteBuf;

use dmail::actor::{MemoryActor, MemoryActorFactory};
use dmail::auth::{AuthClient, Identity};
use dmail::types::{MailError, MailHeader, MailRecord, RegistryError};
use dmail::web::{create_router, AppState};

pub const REGISTRY: &str = "ryjl3-tyaaa-aaaaa-aaaba-cai";
pub const STORAGE: &str = "rrkah-fqaaa-aaaaa-aaaaq-cai";

pub fn registry_id() -> Principal {
    Principal::from_text(REGISTRY).unwrap()
}

pub fn storage_id() -> Principal {
    Principal::from_text(STORAGE).unwrap()
}

/// An inbox entry from `from`.
pub fn record(id: &str, from: &str, subject: &str) -> MailRecord {
    MailRecord {
        mail_id: id.to_string(),
        header: MailHeader {
            from: from.to_string(),
            subject: Some(subject.to_string()),
            timestamp: 1_700_000_000_000_000_000,
            content_type: Some("text/plain".to_string()),
            ..Default::default()
        },
        content: Some(ByteBuf::from(format!("body of {id}").into_bytes())),
        read: false,
    }
}

/// Script the registry to resolve the caller to the test storage canister.
pub fn script_lookup(factory: &MemoryActorFactory) {
    factory.actor(registry_id()).reply(
        "lookup_user",
        Ok::<Vec<String>, RegistryError>(vec![STORAGE.to_string()]),
    );
}

/// Script one `get_mails` page on the test storage canister.
pub fn script_inbox(factory: &MemoryActorFactory, records: Vec<MailRecord>) -> Arc<MemoryActor> {
    let storage = factory.actor(storage_id());
    storage.reply("get_mails", Ok::<Vec<MailRecord>, MailError>(records));
    storage
}

pub fn signed_in() -> AuthClient {
    AuthClient::with_identity(Identity::anonymous())
}

/// A webmail test server over in-memory canisters.
pub fn create_test_server(auth: AuthClient) -> (TestServer, Arc<MemoryActorFactory>) {
    let factory = Arc::new(MemoryActorFactory::new());
    let state = Arc::new(AppState::new(
        Arc::new(auth),
        factory.clone(),
        registry_id(),
    ));
    let router = create_router(state, &[]);
    let server = TestServer::new(router).expect("Failed to create test server");
    (server, factory)
}

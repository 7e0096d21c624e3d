//! In-process actors with scripted replies.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use candid::{CandidType, Principal};
use futures::future::BoxFuture;

use crate::auth::Identity;
use crate::{DmailError, Result};

use super::{Actor, ActorFactory, CallKind};

/// A call observed by a [`MemoryActor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub canister_id: Principal,
    pub kind: CallKind,
    pub method: String,
    /// Candid encoded arguments as sent.
    pub args: Vec<u8>,
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<std::result::Result<Vec<u8>, String>>>,
    calls: Vec<RecordedCall>,
}

/// Actor answering from a queue of scripted replies per method.
///
/// Every call is recorded, including calls with no reply queued, which fail
/// with [`DmailError::Agent`].
pub struct MemoryActor {
    canister_id: Principal,
    script: Mutex<Script>,
}

impl MemoryActor {
    pub fn new(canister_id: Principal) -> Self {
        Self {
            canister_id,
            script: Mutex::new(Script::default()),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue `value` as the next reply to `method`.
    pub fn reply<T: CandidType>(&self, method: &str, value: T) {
        match candid::encode_one(value) {
            Ok(bytes) => self.reply_raw(method, bytes),
            Err(e) => self.fail(method, format!("reply encoding failed: {e}")),
        }
    }

    /// Queue raw reply bytes for `method`.
    pub fn reply_raw(&self, method: &str, bytes: Vec<u8>) {
        self.script()
            .replies
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(bytes));
    }

    /// Queue a transport failure for `method`.
    pub fn fail(&self, method: &str, message: impl Into<String>) {
        self.script()
            .replies
            .entry(method.to_string())
            .or_default()
            .push_back(Err(message.into()));
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script().calls.clone()
    }

    /// Calls received for one method.
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.script()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }
}

impl Actor for MemoryActor {
    fn canister_id(&self) -> Principal {
        self.canister_id
    }

    fn call<'a>(
        &'a self,
        kind: CallKind,
        method: &'a str,
        args: Vec<u8>,
    ) -> BoxFuture<'a, Result<Vec<u8>>> {
        let reply = {
            let mut script = self.script();
            script.calls.push(RecordedCall {
                canister_id: self.canister_id,
                kind,
                method: method.to_string(),
                args,
            });
            script.replies.get_mut(method).and_then(VecDeque::pop_front)
        };

        Box::pin(async move {
            match reply {
                Some(Ok(bytes)) => Ok(bytes),
                Some(Err(message)) => Err(DmailError::Agent(message)),
                None => Err(DmailError::Agent(format!("no reply scripted for {method}"))),
            }
        })
    }
}

/// Hands out one shared [`MemoryActor`] per canister and records every
/// construction.
#[derive(Default)]
pub struct MemoryActorFactory {
    actors: Mutex<HashMap<Principal, Arc<MemoryActor>>>,
    created: Mutex<Vec<(Principal, Option<Principal>)>>,
}

impl MemoryActorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The actor for `canister_id`, created on first use so replies can be
    /// scripted before the code under test constructs it.
    pub fn actor(&self, canister_id: Principal) -> Arc<MemoryActor> {
        self.actors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(canister_id)
            .or_insert_with(|| Arc::new(MemoryActor::new(canister_id)))
            .clone()
    }

    /// Canister ids passed to [`ActorFactory::create_actor`], in order.
    pub fn created(&self) -> Vec<Principal> {
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(canister, _)| *canister)
            .collect()
    }

    /// Caller principals used for each construction, `None` when no identity
    /// was supplied.
    pub fn callers(&self) -> Vec<Option<Principal>> {
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, caller)| *caller)
            .collect()
    }
}

impl ActorFactory for MemoryActorFactory {
    fn create_actor(
        &self,
        canister_id: Principal,
        identity: Option<&Identity>,
    ) -> Result<Arc<dyn Actor>> {
        let caller = identity.map(Identity::principal).transpose()?;
        self.created
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((canister_id, caller));
        Ok(self.actor(canister_id))
    }
}

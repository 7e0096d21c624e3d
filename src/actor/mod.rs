//! Remote actor seam.
//!
//! Wrappers in [`crate::sdk`] talk to canisters only through the [`Actor`]
//! trait, so the replica transport can be swapped for the in-process
//! [`MemoryActor`] in tests.

mod agent;
mod memory;

use std::sync::Arc;

use candid::utils::ArgumentEncoder;
use candid::{CandidType, Principal};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;

use crate::auth::Identity;
use crate::Result;

pub use agent::{AgentActor, AgentActorFactory};
pub use memory::{MemoryActor, MemoryActorFactory, RecordedCall};

/// How a canister method is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Read-only call answered by a single replica.
    Query,
    /// State-changing call that goes through consensus.
    Update,
}

/// A callable proxy for one canister.
pub trait Actor: Send + Sync {
    /// Canister this actor is bound to.
    fn canister_id(&self) -> Principal;

    /// Invoke `method` with candid encoded `args`, returning the encoded reply.
    fn call<'a>(
        &'a self,
        kind: CallKind,
        method: &'a str,
        args: Vec<u8>,
    ) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// Builds actors bound to a canister and an optional caller identity.
pub trait ActorFactory: Send + Sync {
    fn create_actor(
        &self,
        canister_id: Principal,
        identity: Option<&Identity>,
    ) -> Result<Arc<dyn Actor>>;
}

/// Encode `args`, call `method`, and decode a single return value.
pub async fn call<A, R>(actor: &dyn Actor, kind: CallKind, method: &str, args: A) -> Result<R>
where
    A: ArgumentEncoder,
    R: CandidType + DeserializeOwned,
{
    let bytes = candid::encode_args(args)?;
    tracing::debug!(
        canister = %actor.canister_id(),
        method,
        ?kind,
        "calling canister"
    );
    let reply = actor.call(kind, method, bytes).await?;
    Ok(candid::decode_one(&reply)?)
}

//! Actors backed by an `ic-agent` replica connection.

use std::sync::Arc;

use candid::Principal;
use futures::future::BoxFuture;
use ic_agent::Agent;
use tokio::sync::OnceCell;

use crate::auth::Identity;
use crate::config::BackendConfig;
use crate::{DmailError, Result};

use super::{Actor, ActorFactory, CallKind};

/// Creates [`AgentActor`]s talking to one replica URL.
#[derive(Debug, Clone)]
pub struct AgentActorFactory {
    url: String,
    fetch_root_key: bool,
}

impl AgentActorFactory {
    /// Create a factory for the configured replica.
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            url: config.url.clone(),
            fetch_root_key: config.fetch_root_key,
        }
    }
}

impl ActorFactory for AgentActorFactory {
    fn create_actor(
        &self,
        canister_id: Principal,
        identity: Option<&Identity>,
    ) -> Result<Arc<dyn Actor>> {
        let mut builder = Agent::builder().with_url(self.url.clone());
        if let Some(identity) = identity {
            builder = builder.with_arc_identity(identity.to_agent_identity());
        }
        let agent = builder.build()?;

        tracing::debug!(canister = %canister_id, url = %self.url, "created agent actor");

        Ok(Arc::new(AgentActor {
            agent,
            canister_id,
            fetch_root_key: self.fetch_root_key,
            root_key: OnceCell::new(),
        }))
    }
}

/// Actor bound to one canister through an `ic-agent` [`Agent`].
pub struct AgentActor {
    agent: Agent,
    canister_id: Principal,
    fetch_root_key: bool,
    root_key: OnceCell<()>,
}

impl AgentActor {
    /// Fetch the replica root key once, when configured to.
    async fn ensure_root_key(&self) -> Result<()> {
        if !self.fetch_root_key {
            return Ok(());
        }
        self.root_key
            .get_or_try_init(|| async {
                tracing::warn!("fetching replica root key; only do this against a local replica");
                self.agent.fetch_root_key().await.map_err(DmailError::from)
            })
            .await?;
        Ok(())
    }
}

impl Actor for AgentActor {
    fn canister_id(&self) -> Principal {
        self.canister_id
    }

    fn call<'a>(
        &'a self,
        kind: CallKind,
        method: &'a str,
        args: Vec<u8>,
    ) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            self.ensure_root_key().await?;
            let reply = match kind {
                CallKind::Query => {
                    self.agent
                        .query(&self.canister_id, method)
                        .with_arg(args)
                        .call()
                        .await?
                }
                CallKind::Update => {
                    self.agent
                        .update(&self.canister_id, method)
                        .with_arg(args)
                        .call_and_wait()
                        .await?
                }
            };
            Ok(reply)
        })
    }
}

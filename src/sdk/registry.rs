//! Mail registry client.

use std::sync::Arc;

use candid::Principal;

use crate::actor::{self, Actor, ActorFactory, CallKind};
use crate::auth::Identity;
use crate::types::RegistryError;
use crate::{DmailError, Result};

/// Client for the registry canister, which maps a signed-in user and mail
/// domains to their storage canisters.
#[derive(Clone)]
pub struct MailRegistry {
    actor: Arc<dyn Actor>,
}

impl MailRegistry {
    /// Bind a registry client to `canister_id`, signing as `identity`.
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

    /// Resolve the caller's personal mail storage canister.
    ///
    /// The registry answers with every storage the caller is registered on;
    /// the first one is the user's mailbox. An empty answer is reported as
    /// [`RegistryError::NotFound`]. No retries: a tagged error is returned as
    /// [`DmailError::Registry`].
    pub async fn lookup_user(&self) -> Result<Principal> {
        let reply: std::result::Result<Vec<String>, RegistryError> =
            actor::call(self.actor.as_ref(), CallKind::Query, "lookup_user", ()).await?;
        let addresses = reply?;
        let Some(address) = addresses.first() else {
            tracing::warn!("registry has no storage for the caller");
            return Err(RegistryError::NotFound.into());
        };
        if addresses.len() > 1 {
            tracing::debug!(count = addresses.len(), "caller has several storages, using the first");
        }
        tracing::debug!(storage = %address, "registry resolved user storage");
        parse_principal(address)
    }

    /// Resolve the storage canister serving a mail domain.
    pub async fn lookup_domain_name(&self, domain: &str) -> Result<Principal> {
        let reply: std::result::Result<String, RegistryError> = actor::call(
            self.actor.as_ref(),
            CallKind::Query,
            "lookup_domain_name",
            (domain,),
        )
        .await?;
        parse_principal(&reply?)
    }

    /// Human readable description of who serves a domain.
    pub async fn get_domain_details(&self, domain: &str) -> Result<String> {
        let reply: std::result::Result<String, RegistryError> = actor::call(
            self.actor.as_ref(),
            CallKind::Query,
            "get_domain_details",
            (domain,),
        )
        .await?;
        Ok(reply?)
    }
}

fn parse_principal(text: &str) -> Result<Principal> {
    Principal::from_text(text).map_err(|e| DmailError::InvalidPrincipal(format!("{text}: {e}")))
}

mod account_api;
mod destination_api;
mod helpers;
mod ride_api;
mod ride_request_api;
mod vehicle_api;

use oso::Oso;

use crate::{
    api::API,
    auth::authorizor,
    error::{unauthorized_error, Error},
    matching::MatchCriteria,
    store::DynStore,
};

use helpers::RequestLocks;

pub struct Engine {
    store: DynStore,
    authorizor: Oso,
    criteria: MatchCriteria,
    locks: RequestLocks,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: DynStore, criteria: MatchCriteria) -> Result<Self, Error> {
        Ok(Self {
            store,
            authorizor: authorizor::new()?,
            criteria,
            locks: RequestLocks::default(),
        })
    }
}

impl Engine {
    pub fn authorize<Actor, Action, Resource>(
        &self,
        actor: Actor,
        action: Action,
        resource: Resource,
    ) -> Result<(), Error>
    where
        Actor: oso::ToPolar,
        Action: oso::ToPolar,
        Resource: oso::ToPolar,
    {
        if self.authorizor.is_allowed(actor, action, resource)? {
            return Ok(());
        }

        Err(unauthorized_error())
    }
}

impl API for Engine {}

use super::helpers::{create, fetch, fetch_all, replace};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::DestinationAPI,
    auth::{Platform, User},
    entities::{new_id, Destination, DestinationDetails},
    error::Error,
    store::Collection,
};

#[async_trait]
impl DestinationAPI for Engine {
    #[tracing::instrument(skip(self, details))]
    async fn create_destination(&self, user: User, details: DestinationDetails) -> Result<Destination, Error> {
        self.authorize(user.clone(), "manage_destinations", Platform::default())?;
        details.validate()?;

        let destination = details.into_destination(new_id(), user.id);

        create(&self.store, Collection::Destinations, &destination).await
    }

    async fn find_destination(&self, user: User, id: &str) -> Result<Destination, Error> {
        let destination: Destination = fetch(&self.store, Collection::Destinations, id).await?;

        self.authorize(user, "read", destination.clone())?;

        Ok(destination)
    }

    #[tracing::instrument(skip(self, details))]
    async fn update_destination(
        &self,
        user: User,
        id: &str,
        details: DestinationDetails,
    ) -> Result<Destination, Error> {
        let destination: Destination = fetch(&self.store, Collection::Destinations, id).await?;

        self.authorize(user, "update", destination.clone())?;
        details.validate()?;

        let updated = details.into_destination(destination.id, destination.user_id);

        replace(&self.store, Collection::Destinations, id, &updated).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_destination(&self, user: User, id: &str) -> Result<(), Error> {
        let destination: Destination = fetch(&self.store, Collection::Destinations, id).await?;

        self.authorize(user, "delete", destination)?;

        self.store.delete(Collection::Destinations, id).await
    }

    async fn list_destinations(&self, user: User) -> Result<Vec<Destination>, Error> {
        fetch_all(&self.store, Collection::Destinations, &[("userId", user.id.as_str())]).await
    }
}

use super::helpers::{create, fetch, fetch_all, replace};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::VehicleAPI,
    auth::{Platform, User},
    entities::{new_id, Vehicle, VehicleDetails},
    error::Error,
    store::Collection,
};

#[async_trait]
impl VehicleAPI for Engine {
    #[tracing::instrument(skip(self, details))]
    async fn create_vehicle(&self, user: User, details: VehicleDetails) -> Result<Vehicle, Error> {
        self.authorize(user.clone(), "manage_vehicles", Platform::default())?;
        details.validate()?;

        let vehicle = details.into_vehicle(new_id(), user.id);

        create(&self.store, Collection::Vehicles, &vehicle).await
    }

    async fn find_vehicle(&self, id: &str) -> Result<Vehicle, Error> {
        fetch(&self.store, Collection::Vehicles, id).await
    }

    #[tracing::instrument(skip(self, details))]
    async fn update_vehicle(&self, user: User, id: &str, details: VehicleDetails) -> Result<Vehicle, Error> {
        let vehicle: Vehicle = fetch(&self.store, Collection::Vehicles, id).await?;

        self.authorize(user, "update", vehicle.clone())?;
        details.validate()?;

        let updated = details.into_vehicle(vehicle.id, vehicle.driver_id);

        replace(&self.store, Collection::Vehicles, id, &updated).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_vehicle(&self, user: User, id: &str) -> Result<(), Error> {
        let vehicle: Vehicle = fetch(&self.store, Collection::Vehicles, id).await?;

        self.authorize(user, "delete", vehicle)?;

        self.store.delete(Collection::Vehicles, id).await
    }

    async fn list_driver_vehicles(&self, user: User) -> Result<Vec<Vehicle>, Error> {
        self.authorize(user.clone(), "manage_vehicles", Platform::default())?;

        fetch_all(&self.store, Collection::Vehicles, &[("driverId", user.id.as_str())]).await
    }

    #[tracing::instrument(skip(self, details))]
    async fn upsert_driver_vehicle(&self, user: User, details: VehicleDetails) -> Result<Vehicle, Error> {
        let existing = self.list_driver_vehicles(user.clone()).await?;

        match existing.into_iter().next() {
            Some(vehicle) => {
                tracing::info!(id = %vehicle.id, "updating driver's vehicle");
                self.update_vehicle(user, &vehicle.id, details).await
            }
            None => {
                tracing::info!("driver has no vehicle yet, creating one");
                self.create_vehicle(user, details).await
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_driver_vehicle(&self, user: User) -> Result<(), Error> {
        let existing = self.list_driver_vehicles(user.clone()).await?;

        match existing.into_iter().next() {
            Some(vehicle) => self.delete_vehicle(user, &vehicle.id).await,
            None => Ok(()),
        }
    }
}

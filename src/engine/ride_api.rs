use std::collections::HashMap;

use super::helpers::{create, decode, encode, fetch, fetch_all, fetch_by_ids, profiles_by_id, replace};
use super::Engine;

use async_trait::async_trait;
use serde_json::json;

use crate::{
    api::RideAPI,
    auth::{Platform, User},
    entities::{
        new_id,
        ride::Status,
        ride_request::Status as RequestStatus,
        Destination, Ride, RideBoard, RideDetails, RideListing, RideRequest, Vehicle,
    },
    error::{invalid_input_error, invalid_state_error, Error},
    matching::match_rides,
    store::Collection,
};

impl Engine {
    /// Loads the vehicle a ride is offered with, making sure `user` drives it.
    async fn owned_vehicle(&self, user: &User, vehicle_id: &str) -> Result<Vehicle, Error> {
        let vehicle: Vehicle = fetch(&self.store, Collection::Vehicles, vehicle_id).await?;

        if vehicle.driver_id != user.id {
            return Err(invalid_input_error("vehicle does not belong to the driver"));
        }

        Ok(vehicle)
    }

    /// Most recent request status per ride among `user`'s own requests.
    async fn request_statuses(&self, user: &User) -> Result<HashMap<String, RequestStatus>, Error> {
        let mut requests: Vec<RideRequest> =
            fetch_all(&self.store, Collection::RideRequests, &[("userId", user.id.as_str())]).await?;

        requests.sort_by_key(|r| r.created_at);

        Ok(requests
            .into_iter()
            .map(|r| (r.ride_id, r.status))
            .collect())
    }

    async fn listings(
        &self,
        rides: Vec<Ride>,
        statuses: &HashMap<String, RequestStatus>,
    ) -> Result<Vec<RideListing>, Error> {
        let (profiles, vehicles) = futures::try_join!(
            profiles_by_id(&self.store),
            fetch_by_ids::<Vehicle>(
                &self.store,
                Collection::Vehicles,
                rides.iter().map(|r| r.vehicle_id.as_str())
            ),
        )?;

        Ok(rides
            .into_iter()
            .map(|ride| RideListing {
                driver: profiles.get(&ride.driver_id).cloned(),
                vehicle: vehicles.get(&ride.vehicle_id).cloned(),
                request_status: statuses.get(&ride.id).copied(),
                expected_duration: ride.expected_duration(),
                ride,
            })
            .collect())
    }
}

#[async_trait]
impl RideAPI for Engine {
    #[tracing::instrument(skip(self, details))]
    async fn create_ride(&self, user: User, details: RideDetails) -> Result<Ride, Error> {
        self.authorize(user.clone(), "offer_rides", Platform::default())?;

        let vehicle = self.owned_vehicle(&user, &details.vehicle_id).await?;
        details.validate(vehicle.available_seats)?;

        let ride = details.into_ride(new_id(), user.id, Status::Available);

        create(&self.store, Collection::Rides, &ride).await
    }

    async fn find_ride(&self, id: &str) -> Result<Ride, Error> {
        fetch(&self.store, Collection::Rides, id).await
    }

    #[tracing::instrument(skip(self, details))]
    async fn update_ride(&self, user: User, id: &str, details: RideDetails) -> Result<Ride, Error> {
        let ride: Ride = fetch(&self.store, Collection::Rides, id).await?;

        self.authorize(user.clone(), "update", ride.clone())?;

        let vehicle = self.owned_vehicle(&user, &details.vehicle_id).await?;
        details.validate(vehicle.available_seats)?;

        let updated = details.into_ride(ride.id, ride.driver_id, ride.status);

        replace(&self.store, Collection::Rides, id, &updated).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_ride(&self, user: User, id: &str) -> Result<(), Error> {
        let ride: Ride = fetch(&self.store, Collection::Rides, id).await?;

        self.authorize(user, "delete", ride)?;

        self.store.delete(Collection::Rides, id).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_ride_status(&self, user: User, id: &str, status: Status) -> Result<Ride, Error> {
        let ride: Ride = fetch(&self.store, Collection::Rides, id).await?;

        self.authorize(user, "update", ride.clone())?;

        if ride.status == status {
            return Ok(ride);
        }

        if matches!(ride.status, Status::Completed | Status::Cancelled) {
            tracing::info!(from = ?ride.status, "ride is already finished");
            return Err(invalid_state_error());
        }

        let patch = json!({ "status": encode(&status)? });

        decode(self.store.patch(Collection::Rides, id, patch).await?)
    }

    async fn list_driver_rides(&self, user: User) -> Result<Vec<Ride>, Error> {
        self.authorize(user.clone(), "offer_rides", Platform::default())?;

        fetch_all(&self.store, Collection::Rides, &[("driverId", user.id.as_str())]).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_rides(&self, user: User) -> Result<RideBoard, Error> {
        let rides: Vec<Ride> = fetch_all(&self.store, Collection::Rides, &[]).await?;

        if user.is_passenger() {
            let destinations: Vec<Destination> =
                fetch_all(&self.store, Collection::Destinations, &[("userId", user.id.as_str())]).await?;

            let available: Vec<Ride> = rides.into_iter().filter(Ride::is_available).collect();
            let matched = match_rides(&available, &destinations, &self.criteria);
            tracing::info!(count = matched.len(), "matched rides");

            let statuses = self.request_statuses(&user).await?;

            return Ok(RideBoard {
                mine: vec![],
                others: self.listings(matched, &statuses).await?,
            });
        }

        // drivers see all of their own rides, but only what others still offer
        let visible = rides
            .into_iter()
            .filter(|ride| ride.driver_id == user.id || ride.is_available())
            .collect();

        let listings = self.listings(visible, &HashMap::new()).await?;
        let (mine, others) = listings
            .into_iter()
            .partition(|listing| listing.ride.driver_id == user.id);

        Ok(RideBoard { mine, others })
    }
}

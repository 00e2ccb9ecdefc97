use std::collections::HashMap;

use chrono::Utc;

use super::helpers::{create, decode, encode, fetch, fetch_all, fetch_by_ids, profiles_by_id};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RideRequestAPI,
    auth::{Platform, User},
    entities::{
        new_id,
        ride_request::Status,
        Destination, HistorySummary, Itinerary, RequestDetails, RequestStats, Ride, RideRequest, Vehicle,
    },
    error::{invalid_input_error, not_found_error, Error},
    store::Collection,
};

impl Engine {
    /// Picks the destination a new request is for. A passenger with a single
    /// destination does not need to name it.
    async fn request_destination(&self, user: &User, destination_id: Option<String>) -> Result<Destination, Error> {
        let mut destinations: Vec<Destination> =
            fetch_all(&self.store, Collection::Destinations, &[("userId", user.id.as_str())]).await?;

        if destinations.is_empty() {
            return Err(invalid_input_error("register a destination before requesting a ride"));
        }

        match destination_id {
            Some(id) => destinations
                .into_iter()
                .find(|d| d.id == id)
                .ok_or_else(|| not_found_error(Collection::Destinations, &id)),
            None if destinations.len() == 1 => Ok(destinations.remove(0)),
            None => Err(invalid_input_error("choose which destination the ride is for")),
        }
    }

    async fn driver_requests(&self, user: &User) -> Result<Vec<RideRequest>, Error> {
        self.authorize(user.clone(), "offer_rides", Platform::default())?;

        fetch_all(&self.store, Collection::RideRequests, &[("driverId", user.id.as_str())]).await
    }
}

#[async_trait]
impl RideRequestAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn request_ride(
        &self,
        user: User,
        ride_id: &str,
        destination_id: Option<String>,
    ) -> Result<RideRequest, Error> {
        self.authorize(user.clone(), "request_rides", Platform::default())?;

        let ride: Ride = fetch(&self.store, Collection::Rides, ride_id).await?;

        if !ride.is_available() {
            return Err(invalid_input_error("ride is not available"));
        }

        let existing: Vec<RideRequest> = fetch_all(
            &self.store,
            Collection::RideRequests,
            &[("userId", user.id.as_str()), ("rideId", ride_id)],
        )
        .await?;

        if existing.iter().any(RideRequest::is_pending) {
            tracing::info!("passenger already has a pending request for this ride");
            return Err(invalid_input_error("a request for this ride is already pending"));
        }

        let destination = self.request_destination(&user, destination_id).await?;

        let request = RideRequest::new(
            new_id(),
            ride.id,
            user.id,
            ride.driver_id,
            destination.id,
            Utc::now(),
        );

        create(&self.store, Collection::RideRequests, &request).await
    }

    async fn find_request(&self, user: User, id: &str) -> Result<RideRequest, Error> {
        let request: RideRequest = fetch(&self.store, Collection::RideRequests, id).await?;

        self.authorize(user, "read", request.clone())?;

        Ok(request)
    }

    #[tracing::instrument(skip(self), fields(actor = %user.id))]
    async fn transition_request(&self, user: User, id: &str, target: Status) -> Result<RideRequest, Error> {
        let _guard = self.locks.acquire(id).await;

        let mut request: RideRequest = fetch(&self.store, Collection::RideRequests, id).await?;
        let change = request.transition(target, &user.id, Utc::now())?;

        tracing::info!(status = %change.status, "persisting transition");

        decode(
            self.store
                .patch(Collection::RideRequests, id, encode(&change)?)
                .await?,
        )
    }

    #[tracing::instrument(skip(self))]
    async fn driver_inbox(&self, user: User) -> Result<Vec<RequestDetails>, Error> {
        let requests = self.driver_requests(&user).await?;

        let (destinations, profiles) = futures::try_join!(
            fetch_by_ids::<Destination>(
                &self.store,
                Collection::Destinations,
                requests.iter().map(|r| r.destination_id.as_str())
            ),
            profiles_by_id(&self.store),
        )?;

        Ok(requests
            .into_iter()
            .filter_map(|request| match destinations.get(&request.destination_id) {
                Some(destination) => Some(RequestDetails {
                    passenger: profiles.get(&request.user_id).cloned(),
                    destination: Some(destination.clone()),
                    ..RequestDetails::new(request)
                }),
                None => {
                    tracing::warn!(id = %request.id, "skipping request whose destination is gone");
                    None
                }
            })
            .collect())
    }

    async fn driver_stats(&self, user: User) -> Result<RequestStats, Error> {
        let requests = self.driver_requests(&user).await?;

        Ok(RequestStats::tally(&requests))
    }

    #[tracing::instrument(skip(self))]
    async fn travel_history(&self, user: User) -> Result<Vec<RequestDetails>, Error> {
        let filter = if user.is_driver() { "driverId" } else { "userId" };
        let requests: Vec<RideRequest> =
            fetch_all(&self.store, Collection::RideRequests, &[(filter, user.id.as_str())]).await?;

        let rides: HashMap<String, Ride> = fetch_by_ids(
            &self.store,
            Collection::Rides,
            requests.iter().map(|r| r.ride_id.as_str()),
        )
        .await?;

        let (vehicles, profiles) = futures::try_join!(
            fetch_by_ids::<Vehicle>(
                &self.store,
                Collection::Vehicles,
                rides.values().map(|r| r.vehicle_id.as_str())
            ),
            profiles_by_id(&self.store),
        )?;

        let now = Utc::now();
        let mut history: Vec<RequestDetails> = requests
            .into_iter()
            .map(|request| {
                let ride = rides.get(&request.ride_id).cloned();
                let vehicle = ride.as_ref().and_then(|r| vehicles.get(&r.vehicle_id).cloned());
                let passenger = if user.is_driver() {
                    profiles.get(&request.user_id).cloned()
                } else {
                    None
                };

                RequestDetails {
                    driver: profiles.get(&request.driver_id).cloned(),
                    elapsed: request.elapsed(now),
                    ride,
                    vehicle,
                    passenger,
                    ..RequestDetails::new(request)
                }
            })
            .collect();

        history.sort_by(|a, b| b.request.created_at.cmp(&a.request.created_at));

        Ok(history)
    }

    async fn history_summary(&self, user: User) -> Result<HistorySummary, Error> {
        let history = self.travel_history(user).await?;

        Ok(HistorySummary::tally(&history))
    }

    #[tracing::instrument(skip(self))]
    async fn driver_itinerary(&self, user: User) -> Result<Option<Itinerary>, Error> {
        let requests = self.driver_requests(&user).await?;

        let accepted: Vec<RideRequest> = requests
            .into_iter()
            .filter(|r| r.status == Status::Accepted)
            .collect();

        let destinations: HashMap<String, Destination> = fetch_by_ids(
            &self.store,
            Collection::Destinations,
            accepted.iter().map(|r| r.destination_id.as_str()),
        )
        .await?;

        let stops = accepted
            .iter()
            .filter_map(|r| destinations.get(&r.destination_id).cloned())
            .collect();

        Ok(Itinerary::plan(stops))
    }
}

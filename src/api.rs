use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::User;
use crate::entities::ride::Status as RideStatus;
use crate::entities::ride_request::Status as RequestStatus;
use crate::entities::{
    Destination, DestinationDetails, HistorySummary, Itinerary, Profile, Registration, RequestDetails,
    RequestStats, Ride, RideBoard, RideDetails, RideRequest, Vehicle, VehicleDetails,
};
use crate::error::Error;

#[async_trait]
pub trait AccountAPI {
    async fn register(&self, registration: Registration) -> Result<Profile, Error>;
    async fn login(&self, email: &str, password: &str) -> Result<Profile, Error>;
    /// Resolves the session user from an account id.
    async fn find_user(&self, id: &str) -> Result<User, Error>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, Error>;
}

#[async_trait]
pub trait VehicleAPI {
    async fn create_vehicle(&self, user: User, details: VehicleDetails) -> Result<Vehicle, Error>;
    async fn find_vehicle(&self, id: &str) -> Result<Vehicle, Error>;
    async fn update_vehicle(&self, user: User, id: &str, details: VehicleDetails) -> Result<Vehicle, Error>;
    async fn delete_vehicle(&self, user: User, id: &str) -> Result<(), Error>;
    async fn list_driver_vehicles(&self, user: User) -> Result<Vec<Vehicle>, Error>;
    /// Updates the driver's first vehicle, or creates one if they have none.
    async fn upsert_driver_vehicle(&self, user: User, details: VehicleDetails) -> Result<Vehicle, Error>;
    async fn delete_driver_vehicle(&self, user: User) -> Result<(), Error>;
}

#[async_trait]
pub trait DestinationAPI {
    async fn create_destination(&self, user: User, details: DestinationDetails) -> Result<Destination, Error>;
    async fn find_destination(&self, user: User, id: &str) -> Result<Destination, Error>;
    async fn update_destination(&self, user: User, id: &str, details: DestinationDetails) -> Result<Destination, Error>;
    async fn delete_destination(&self, user: User, id: &str) -> Result<(), Error>;
    async fn list_destinations(&self, user: User) -> Result<Vec<Destination>, Error>;
}

#[async_trait]
pub trait RideAPI {
    async fn create_ride(&self, user: User, details: RideDetails) -> Result<Ride, Error>;
    async fn find_ride(&self, id: &str) -> Result<Ride, Error>;
    async fn update_ride(&self, user: User, id: &str, details: RideDetails) -> Result<Ride, Error>;
    async fn delete_ride(&self, user: User, id: &str) -> Result<(), Error>;
    async fn update_ride_status(&self, user: User, id: &str, status: RideStatus) -> Result<Ride, Error>;
    async fn list_driver_rides(&self, user: User) -> Result<Vec<Ride>, Error>;
    async fn list_rides(&self, user: User) -> Result<RideBoard, Error>;
}

#[async_trait]
pub trait RideRequestAPI {
    async fn request_ride(&self, user: User, ride_id: &str, destination_id: Option<String>) -> Result<RideRequest, Error>;
    async fn find_request(&self, user: User, id: &str) -> Result<RideRequest, Error>;
    async fn transition_request(&self, user: User, id: &str, target: RequestStatus) -> Result<RideRequest, Error>;
    async fn driver_inbox(&self, user: User) -> Result<Vec<RequestDetails>, Error>;
    async fn driver_stats(&self, user: User) -> Result<RequestStats, Error>;
    async fn travel_history(&self, user: User) -> Result<Vec<RequestDetails>, Error>;
    async fn history_summary(&self, user: User) -> Result<HistorySummary, Error>;
    async fn driver_itinerary(&self, user: User) -> Result<Option<Itinerary>, Error>;

    async fn accept_request(&self, user: User, id: &str) -> Result<RideRequest, Error> {
        self.transition_request(user, id, RequestStatus::Accepted).await
    }

    async fn reject_request(&self, user: User, id: &str) -> Result<RideRequest, Error> {
        self.transition_request(user, id, RequestStatus::Rejected).await
    }

    async fn start_request(&self, user: User, id: &str) -> Result<RideRequest, Error> {
        self.transition_request(user, id, RequestStatus::InProgress).await
    }

    async fn complete_request(&self, user: User, id: &str) -> Result<RideRequest, Error> {
        self.transition_request(user, id, RequestStatus::Completed).await
    }

    async fn cancel_request(&self, user: User, id: &str) -> Result<RideRequest, Error> {
        self.transition_request(user, id, RequestStatus::Cancelled).await
    }
}

pub trait API: AccountAPI + VehicleAPI + DestinationAPI + RideAPI + RideRequestAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;

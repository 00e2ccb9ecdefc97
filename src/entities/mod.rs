mod account;
mod board;
mod destination;
mod fields;
mod itinerary;
mod location;
pub mod ride;
pub mod ride_request;
pub mod vehicle;

pub use account::{is_valid_email, Account, Profile, Registration, Role};
pub use board::{HistorySummary, RequestDetails, RideBoard, RideListing};
pub use destination::{Destination, DestinationDetails};
pub use fields::{new_id, ClockTime};
pub use itinerary::Itinerary;
pub use location::{expected_duration, haversine_km, Coordinates};
pub use ride::{Ride, RideDetails};
pub use ride_request::{RequestStats, RideRequest, StatusChange};
pub use vehicle::{Vehicle, VehicleDetails};

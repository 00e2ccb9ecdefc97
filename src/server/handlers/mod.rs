pub mod destinations;
pub mod ride_requests;
pub mod rides;
pub mod users;
pub mod vehicles;

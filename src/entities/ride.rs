use chrono::Duration;
use oso::PolarClass;
use serde::{Deserialize, Serialize};

use super::destination::validate_coordinates;
use super::fields::{id, ClockTime};
use super::location::{expected_duration, Coordinates};
use crate::error::{invalid_input_error, Error};

/// A ride offer published by a driver. Its status is tracked separately
/// from the status of the requests passengers make against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, PolarClass)]
#[serde(rename_all = "camelCase")]
pub struct Ride {
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub driver_id: String,
    #[serde(deserialize_with = "id::deserialize")]
    pub vehicle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    pub start_address: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_address: String,
    pub end_lat: f64,
    pub end_lng: f64,
    pub start_time: ClockTime,
    pub available_seats: u32,
    pub status: Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideDetails {
    pub vehicle_id: String,
    #[serde(default)]
    pub route_id: Option<String>,
    pub start_address: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_address: String,
    pub end_lat: f64,
    pub end_lng: f64,
    pub start_time: ClockTime,
    pub available_seats: u32,
}

impl Ride {
    pub fn start(&self) -> Coordinates {
        Coordinates::new(self.start_lat, self.start_lng)
    }

    pub fn end(&self) -> Coordinates {
        Coordinates::new(self.end_lat, self.end_lng)
    }

    pub fn is_available(&self) -> bool {
        self.status == Status::Available
    }

    pub fn expected_duration(&self) -> Duration {
        expected_duration(self.start(), self.end())
    }
}

impl RideDetails {
    pub fn validate(&self, vehicle_seats: u32) -> Result<(), Error> {
        if self.start_address.trim().is_empty() || self.end_address.trim().is_empty() {
            return Err(invalid_input_error("start and end addresses are required"));
        }

        validate_coordinates(Coordinates::new(self.start_lat, self.start_lng))?;
        validate_coordinates(Coordinates::new(self.end_lat, self.end_lng))?;

        if self.available_seats < 1 || self.available_seats > vehicle_seats {
            return Err(invalid_input_error(format!(
                "available seats must be between 1 and {}",
                vehicle_seats
            )));
        }

        Ok(())
    }

    pub fn into_ride(self, id: String, driver_id: String, status: Status) -> Ride {
        Ride {
            id,
            driver_id,
            vehicle_id: self.vehicle_id,
            route_id: self.route_id,
            start_address: self.start_address,
            start_lat: self.start_lat,
            start_lng: self.start_lng,
            end_address: self.end_address,
            end_lat: self.end_lat,
            end_lng: self.end_lng,
            start_time: self.start_time,
            available_seats: self.available_seats,
            status,
        }
    }
}

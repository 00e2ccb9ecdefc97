use oso::PolarClass;
use serde::{Deserialize, Serialize};

use super::fields::{id, ClockTime};
use super::location::Coordinates;
use crate::error::{invalid_input_error, Error};

/// A passenger's recurring trip: where and when they usually leave, and
/// where they are headed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, PolarClass)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub user_id: String,
    #[serde(default)]
    pub default: bool,
    pub name: String,
    pub start_address: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub start_time: ClockTime,
    pub end_address: String,
    pub end_lat: f64,
    pub end_lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDetails {
    #[serde(default)]
    pub default: bool,
    pub name: String,
    pub start_address: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub start_time: ClockTime,
    pub end_address: String,
    pub end_lat: f64,
    pub end_lng: f64,
}

impl Destination {
    pub fn start(&self) -> Coordinates {
        Coordinates::new(self.start_lat, self.start_lng)
    }

    pub fn end(&self) -> Coordinates {
        Coordinates::new(self.end_lat, self.end_lng)
    }
}

impl DestinationDetails {
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(invalid_input_error("name is required"));
        }

        if self.start_address.trim().is_empty() || self.end_address.trim().is_empty() {
            return Err(invalid_input_error("start and end addresses are required"));
        }

        validate_coordinates(Coordinates::new(self.start_lat, self.start_lng))?;
        validate_coordinates(Coordinates::new(self.end_lat, self.end_lng))
    }

    pub fn into_destination(self, id: String, user_id: String) -> Destination {
        Destination {
            id,
            user_id,
            default: self.default,
            name: self.name,
            start_address: self.start_address,
            start_lat: self.start_lat,
            start_lng: self.start_lng,
            start_time: self.start_time,
            end_address: self.end_address,
            end_lat: self.end_lat,
            end_lng: self.end_lng,
        }
    }
}

pub fn validate_coordinates(c: Coordinates) -> Result<(), Error> {
    let lat_ok = c.lat.is_finite() && (-90.0..=90.0).contains(&c.lat);
    let lng_ok = c.lng.is_finite() && (-180.0..=180.0).contains(&c.lng);

    if lat_ok && lng_ok {
        Ok(())
    } else {
        Err(invalid_input_error(format!(
            "coordinates out of range: {}, {}",
            c.lat, c.lng
        )))
    }
}

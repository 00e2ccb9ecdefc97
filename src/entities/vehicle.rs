use oso::PolarClass;
use serde::{Deserialize, Serialize};

use super::fields::id;
use crate::error::{invalid_input_error, Error};

pub const MAX_CAR_SEATS: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    Car,
    Motorcycle,
}

impl Kind {
    pub fn max_seats(&self) -> u32 {
        match self {
            Self::Car => MAX_CAR_SEATS,
            Self::Motorcycle => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, PolarClass)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[polar(attribute)]
    #[serde(deserialize_with = "id::deserialize")]
    pub driver_id: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub license_plate: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub available_seats: u32,
}

/// Vehicle fields a driver submits; ownership and id are filled in by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub license_plate: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub available_seats: u32,
}

impl VehicleDetails {
    pub fn validate(&self) -> Result<(), Error> {
        let required = [
            ("brand", &self.brand),
            ("model", &self.model),
            ("color", &self.color),
            ("licensePlate", &self.license_plate),
        ];

        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(invalid_input_error(format!("{} is required", field)));
        }

        let max = self.kind.max_seats();
        if self.available_seats < 1 || self.available_seats > max {
            return Err(invalid_input_error(format!(
                "available seats must be between 1 and {}",
                max
            )));
        }

        Ok(())
    }

    pub fn into_vehicle(self, id: String, driver_id: String) -> Vehicle {
        Vehicle {
            id,
            driver_id,
            brand: self.brand,
            model: self.model,
            color: self.color,
            license_plate: self.license_plate,
            kind: self.kind,
            available_seats: self.available_seats,
        }
    }
}

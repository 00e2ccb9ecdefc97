//! Which published rides are worth showing to a passenger.
//!
//! A ride matches when one of the passenger's destinations both starts
//! close to the ride's starting point and leaves at about the same time.

use serde::{Deserialize, Serialize};

use crate::entities::{Destination, Ride};

pub const DEFAULT_RADIUS_KM: f64 = 5.0;
pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    pub radius_km: f64,
    pub window_minutes: i64,
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self {
            radius_km: DEFAULT_RADIUS_KM,
            window_minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}

impl MatchCriteria {
    pub fn is_near(&self, ride: &Ride, destination: &Destination) -> bool {
        ride.start().distance_km(&destination.start()) <= self.radius_km
    }

    pub fn is_on_time(&self, ride: &Ride, destination: &Destination) -> bool {
        ride.start_time.minutes_between(&destination.start_time) <= self.window_minutes
    }

    /// Both conditions are checked against the same destination.
    pub fn matches(&self, ride: &Ride, destination: &Destination) -> bool {
        self.is_near(ride, destination) && self.is_on_time(ride, destination)
    }
}

/// Rides that match at least one destination, in their original order.
pub fn match_rides<'a, I>(rides: I, destinations: &[Destination], criteria: &MatchCriteria) -> Vec<Ride>
where
    I: IntoIterator<Item = &'a Ride>,
{
    rides
        .into_iter()
        .filter(|ride| destinations.iter().any(|d| criteria.matches(ride, d)))
        .cloned()
        .collect()
}

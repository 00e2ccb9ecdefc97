use chrono::Duration;
use serde::{Serialize, Serializer};

use super::ride_request::Status as RequestStatus;
use super::{Destination, Profile, Ride, RideRequest, Vehicle};

/// A ride together with what a listing needs to show about it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideListing {
    pub ride: Ride,
    pub driver: Option<Profile>,
    pub vehicle: Option<Vehicle>,
    /// Status of the viewing passenger's own request for this ride.
    pub request_status: Option<RequestStatus>,
    #[serde(serialize_with = "minutes")]
    pub expected_duration: Duration,
}

/// Drivers see their own rides apart from everyone else's; passengers only
/// get `others`, already narrowed to their matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RideBoard {
    pub mine: Vec<RideListing>,
    pub others: Vec<RideListing>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    pub request: RideRequest,
    pub ride: Option<Ride>,
    pub destination: Option<Destination>,
    pub driver: Option<Profile>,
    pub passenger: Option<Profile>,
    pub vehicle: Option<Vehicle>,
    #[serde(serialize_with = "optional_minutes")]
    pub elapsed: Option<Duration>,
}

impl RequestDetails {
    pub fn new(request: RideRequest) -> Self {
        Self {
            request,
            ride: None,
            destination: None,
            driver: None,
            passenger: None,
            vehicle: None,
            elapsed: None,
        }
    }
}

/// Totals over a travel history. Distance and time are straight-line
/// estimates and only count entries whose ride is still known.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total: usize,
    /// Accepted and completed trips together.
    pub completed: usize,
    pub distance_km: f64,
    #[serde(serialize_with = "minutes")]
    pub expected_duration: Duration,
}

impl HistorySummary {
    pub fn tally<'a>(history: impl IntoIterator<Item = &'a RequestDetails>) -> Self {
        let empty = Self {
            total: 0,
            completed: 0,
            distance_km: 0.0,
            expected_duration: Duration::zero(),
        };

        history.into_iter().fold(empty, |mut summary, details| {
            summary.total += 1;

            if matches!(
                details.request.status,
                RequestStatus::Accepted | RequestStatus::Completed
            ) {
                summary.completed += 1;
            }

            if let Some(ride) = &details.ride {
                summary.distance_km += ride.start().distance_km(&ride.end());
                summary.expected_duration = summary.expected_duration + ride.expected_duration();
            }

            summary
        })
    }
}

fn minutes<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(d.num_minutes())
}

fn optional_minutes<S: Serializer>(d: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => serializer.serialize_some(&d.num_minutes()),
        None => serializer.serialize_none(),
    }
}

use serde::Serialize;

use super::destination::Destination;
use super::location::Coordinates;

/// The route a driver follows to serve every accepted passenger: pick-ups
/// in departure order, ending at the last passenger's destination.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
    pub stops: Vec<Destination>,
}

impl Itinerary {
    pub fn plan(mut stops: Vec<Destination>) -> Option<Self> {
        stops.sort_by_key(|d| d.start_time);

        let origin = stops.first()?.start();
        let destination = stops.last()?.end();

        let waypoints = match stops.len() {
            0..=2 => vec![],
            n => stops[1..n - 1].iter().map(Destination::start).collect(),
        };

        Some(Self {
            origin,
            destination,
            waypoints,
            stops,
        })
    }
}

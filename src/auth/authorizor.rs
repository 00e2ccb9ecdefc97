use oso::{Oso, PolarClass};

use crate::auth::{Platform, User};
use crate::entities::{Destination, Ride, RideRequest, Vehicle};
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class())?;
    o.register_class(User::get_polar_class())?;
    o.register_class(Ride::get_polar_class())?;
    o.register_class(Vehicle::get_polar_class())?;
    o.register_class(Destination::get_polar_class())?;
    o.register_class(RideRequest::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::ride::Status;
use crate::entities::{Ride, RideBoard, RideDetails};
use crate::error::Error;
use crate::server::Session;

#[derive(Serialize, Deserialize)]
pub struct StatusParams {
    status: Status,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(details): Json<RideDetails>,
) -> Result<Json<Ride>, Error> {
    let ride = api.create_ride(user, details).await?;

    Ok(ride.into())
}

pub async fn board(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<RideBoard>, Error> {
    let board = api.list_rides(user).await?;

    Ok(board.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(_): Session,
    Path(id): Path<String>,
) -> Result<Json<Ride>, Error> {
    let ride = api.find_ride(&id).await?;

    Ok(ride.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
    Json(details): Json<RideDetails>,
) -> Result<Json<Ride>, Error> {
    let ride = api.update_ride(user, &id, details).await?;

    Ok(ride.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<(), Error> {
    api.delete_ride(user, &id).await
}

pub async fn update_status(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
    Json(params): Json<StatusParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api.update_ride_status(user, &id, params.status).await?;

    Ok(ride.into())
}

pub async fn list_mine(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Vec<Ride>>, Error> {
    let rides = api.list_driver_rides(user).await?;

    Ok(rides.into())
}

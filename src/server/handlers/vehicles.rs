use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::{Vehicle, VehicleDetails};
use crate::error::Error;
use crate::server::Session;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(details): Json<VehicleDetails>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.create_vehicle(user, details).await?;

    Ok(vehicle.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(_): Session,
    Path(id): Path<String>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.find_vehicle(&id).await?;

    Ok(vehicle.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
    Json(details): Json<VehicleDetails>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.update_vehicle(user, &id, details).await?;

    Ok(vehicle.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<(), Error> {
    api.delete_vehicle(user, &id).await
}

pub async fn list_mine(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Vec<Vehicle>>, Error> {
    let vehicles = api.list_driver_vehicles(user).await?;

    Ok(vehicles.into())
}

pub async fn upsert_mine(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(details): Json<VehicleDetails>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.upsert_driver_vehicle(user, details).await?;

    Ok(vehicle.into())
}

pub async fn delete_mine(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<(), Error> {
    api.delete_driver_vehicle(user).await
}

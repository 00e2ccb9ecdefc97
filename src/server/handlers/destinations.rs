use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::{Destination, DestinationDetails};
use crate::error::Error;
use crate::server::Session;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(details): Json<DestinationDetails>,
) -> Result<Json<Destination>, Error> {
    let destination = api.create_destination(user, details).await?;

    Ok(destination.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Vec<Destination>>, Error> {
    let destinations = api.list_destinations(user).await?;

    Ok(destinations.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<Destination>, Error> {
    let destination = api.find_destination(user, &id).await?;

    Ok(destination.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
    Json(details): Json<DestinationDetails>,
) -> Result<Json<Destination>, Error> {
    let destination = api.update_destination(user, &id, details).await?;

    Ok(destination.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<(), Error> {
    api.delete_destination(user, &id).await
}

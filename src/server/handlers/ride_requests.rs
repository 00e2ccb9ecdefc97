use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{HistorySummary, Itinerary, RequestDetails, RequestStats, RideRequest};
use crate::error::Error;
use crate::server::Session;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    ride_id: String,
    #[serde(default)]
    destination_id: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Json(params): Json<CreateParams>,
) -> Result<Json<RideRequest>, Error> {
    let request = api
        .request_ride(user, &params.ride_id, params.destination_id)
        .await?;

    Ok(request.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.find_request(user, &id).await?;

    Ok(request.into())
}

pub async fn accept(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.accept_request(user, &id).await?;

    Ok(request.into())
}

pub async fn reject(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.reject_request(user, &id).await?;

    Ok(request.into())
}

pub async fn start(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.start_request(user, &id).await?;

    Ok(request.into())
}

pub async fn complete(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.complete_request(user, &id).await?;

    Ok(request.into())
}

pub async fn cancel(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
    Path(id): Path<String>,
) -> Result<Json<RideRequest>, Error> {
    let request = api.cancel_request(user, &id).await?;

    Ok(request.into())
}

pub async fn inbox(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Vec<RequestDetails>>, Error> {
    let requests = api.driver_inbox(user).await?;

    Ok(requests.into())
}

pub async fn stats(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<RequestStats>, Error> {
    let stats = api.driver_stats(user).await?;

    Ok(stats.into())
}

pub async fn history(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Vec<RequestDetails>>, Error> {
    let history = api.travel_history(user).await?;

    Ok(history.into())
}

pub async fn history_summary(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<HistorySummary>, Error> {
    let summary = api.history_summary(user).await?;

    Ok(summary.into())
}

pub async fn itinerary(
    Extension(api): Extension<DynAPI>,
    Session(user): Session,
) -> Result<Json<Option<Itinerary>>, Error> {
    let itinerary = api.driver_itinerary(user).await?;

    Ok(itinerary.into())
}

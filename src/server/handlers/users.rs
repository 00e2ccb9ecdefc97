use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::auth::User;
use crate::entities::{Profile, Registration};
use crate::error::Error;
use crate::server::Session;

#[derive(Serialize, Deserialize)]
pub struct LoginParams {
    email: String,
    password: String,
}

pub async fn register(
    Extension(api): Extension<DynAPI>,
    Json(registration): Json<Registration>,
) -> Result<Json<Profile>, Error> {
    let profile = api.register(registration).await?;

    Ok(profile.into())
}

pub async fn login(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<LoginParams>,
) -> Result<Json<Profile>, Error> {
    let profile = api.login(&params.email, &params.password).await?;

    Ok(profile.into())
}

pub async fn me(Session(user): Session) -> Json<User> {
    user.into()
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Session(_): Session,
) -> Result<Json<Vec<Profile>>, Error> {
    let profiles = api.list_profiles().await?;

    Ok(profiles.into())
}

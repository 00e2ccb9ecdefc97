use async_trait::async_trait;
use axum::extract::{Extension, FromRequest, RequestParts};

use crate::api::DynAPI;
use crate::auth::User;
use crate::error::{unauthenticated_error, unexpected_error, Error};

/// Header carrying the id of the logged-in account.
pub const USER_HEADER: &str = "x-user-id";

/// The user a request is made on behalf of.
pub struct Session(pub User);

#[async_trait]
impl<B: Send> FromRequest<B> for Session {
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(api) = Extension::<DynAPI>::from_request(req)
            .await
            .map_err(|_| unexpected_error())?;

        let id = req
            .headers()
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(unauthenticated_error)?;

        Ok(Session(api.find_user(&id).await?))
    }
}

mod handlers;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post, put},
    Router,
};

use crate::api::{DynAPI, API};
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{destinations, ride_requests, rides, users, vehicles};

pub use session::{Session, USER_HEADER};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/users", post(users::register).get(users::list))
        .route("/users/me", get(users::me))
        .route("/sessions", post(users::login))
        .route("/vehicles", post(vehicles::create))
        .route(
            "/vehicles/:id",
            get(vehicles::find)
                .put(vehicles::update)
                .delete(vehicles::delete),
        )
        .route("/destinations", post(destinations::create).get(destinations::list))
        .route(
            "/destinations/:id",
            get(destinations::find)
                .put(destinations::update)
                .delete(destinations::delete),
        )
        .route("/rides", post(rides::create).get(rides::board))
        .route(
            "/rides/:id",
            get(rides::find).put(rides::update).delete(rides::delete),
        )
        .route("/rides/:id/status", patch(rides::update_status))
        .route("/ride-requests", post(ride_requests::create))
        .route("/ride-requests/:id", get(ride_requests::find))
        .route("/ride-requests/:id/accept", patch(ride_requests::accept))
        .route("/ride-requests/:id/reject", patch(ride_requests::reject))
        .route("/ride-requests/:id/start", patch(ride_requests::start))
        .route("/ride-requests/:id/complete", patch(ride_requests::complete))
        .route("/ride-requests/:id/cancel", patch(ride_requests::cancel))
        .route("/me/history", get(ride_requests::history))
        .route("/me/history/stats", get(ride_requests::history_summary))
        .route("/drivers/me/rides", get(rides::list_mine))
        .route("/drivers/me/requests", get(ride_requests::inbox))
        .route("/drivers/me/requests/stats", get(ride_requests::stats))
        .route("/drivers/me/itinerary", get(ride_requests::itinerary))
        .route("/drivers/me/vehicles", get(vehicles::list_mine))
        .route(
            "/drivers/me/vehicle",
            put(vehicles::upsert_mine).delete(vehicles::delete_mine),
        )
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(Arc::new(api) as DynAPI);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|e| {
            tracing::error!("server stopped: {}", e);
            unexpected_error()
        })
}

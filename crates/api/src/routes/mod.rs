pub mod health;
pub mod trips;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /trips                     cached trips, filters, sync and membership
/// /trip                      create a trip without a sheet column (POST)
/// /free-crew/{trip_id}       users not active in the trip
/// /users                     register crew (POST), get by id
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/trips", trips::router())
        .route("/trip", post(handlers::trips::create_trip))
        .route("/free-crew/{trip_id}", get(handlers::trips::free_crew))
        .nest("/users", users::router())
}

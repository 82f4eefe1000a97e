//! Route definitions for the `/trips` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::trips;
use crate::state::AppState;

/// Routes mounted at `/trips`.
///
/// ```text
/// GET  /                   -> list_trips
/// GET  /date/{date}        -> trips_on_date
/// GET  /type/{trip_type}   -> trips_of_type
/// GET  /range              -> trips_in_range (?from=&to=)
/// GET  /status             -> sync_status
/// GET  /stats              -> trip_stats
/// POST /refresh            -> refresh
/// POST /join               -> join
/// POST /leave              -> leave
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips::list_trips))
        .route("/date/{date}", get(trips::trips_on_date))
        .route("/type/{trip_type}", get(trips::trips_of_type))
        .route("/range", get(trips::trips_in_range))
        .route("/status", get(trips::sync_status))
        .route("/stats", get(trips::trip_stats))
        .route("/refresh", post(trips::refresh))
        .route("/join", post(trips::join))
        .route("/leave", post(trips::leave))
}

//! Handlers for trips, crew membership and free crew.
//!
//! Reads are served from the [`TripsService`](orion_pipeline::TripsService)
//! cache; writes go through the service and refresh it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use orion_core::activity::TripType;
use orion_core::types::{Timestamp, TripId, UserId};
use orion_pipeline::service::{SyncOutcome, SyncStatus, TripStats};
use orion_pipeline::store::{FreeCrewMember, TripView};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /trips/range`.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Body of `POST /trips/join` and `POST /trips/leave`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    pub user_id: UserId,
    pub trip_id: TripId,
    /// A captain's removal keeps the membership as kicked.
    #[serde(default)]
    pub by_captain: bool,
}

/// Body of `POST /trip`.
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    #[serde(rename = "type")]
    pub trip_type: String,
    pub departure: Timestamp,
}

// ---- reads ----

/// GET /api/v1/trips
pub async fn list_trips(State(state): State<AppState>) -> Json<DataResponse<Vec<TripView>>> {
    Json(DataResponse {
        data: state.trips.get_trips().await,
    })
}

/// GET /api/v1/trips/date/{date}
pub async fn trips_on_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Json<DataResponse<Vec<TripView>>> {
    Json(DataResponse {
        data: state.trips.trips_on(date).await,
    })
}

/// GET /api/v1/trips/type/{trip_type}
pub async fn trips_of_type(
    State(state): State<AppState>,
    Path(trip_type): Path<String>,
) -> AppResult<Json<DataResponse<Vec<TripView>>>> {
    let trip_type = parse_trip_type(&trip_type)?;
    Ok(Json(DataResponse {
        data: state.trips.trips_of_type(trip_type).await,
    }))
}

/// GET /api/v1/trips/range?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// Both bounds are inclusive.
pub async fn trips_in_range(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> AppResult<Json<DataResponse<Vec<TripView>>>> {
    if range.from > range.to {
        return Err(AppError::BadRequest(format!(
            "Range start {} is after its end {}",
            range.from, range.to
        )));
    }
    Ok(Json(DataResponse {
        data: state.trips.trips_between(range.from, range.to).await,
    }))
}

/// GET /api/v1/trips/status
pub async fn sync_status(State(state): State<AppState>) -> Json<DataResponse<SyncStatus>> {
    Json(DataResponse {
        data: state.trips.status().await,
    })
}

/// GET /api/v1/trips/stats
pub async fn trip_stats(State(state): State<AppState>) -> Json<DataResponse<TripStats>> {
    Json(DataResponse {
        data: state.trips.stats().await,
    })
}

/// GET /api/v1/free-crew/{trip_id}
///
/// Registered users without an active membership in the trip.
pub async fn free_crew(
    State(state): State<AppState>,
    Path(trip_id): Path<TripId>,
) -> AppResult<Json<DataResponse<Vec<FreeCrewMember>>>> {
    let data = state.trips.get_free_crew(trip_id).await?;
    Ok(Json(DataResponse { data }))
}

// ---- writes ----

/// POST /api/v1/trips/refresh
///
/// Run the sheet sync now instead of waiting for the schedule.
pub async fn refresh(State(state): State<AppState>) -> AppResult<Json<DataResponse<SyncOutcome>>> {
    let data = state.trips.update_trips().await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/trips/join
pub async fn join(
    State(state): State<AppState>,
    Json(body): Json<ParticipantRequest>,
) -> AppResult<Json<DataResponse<TripView>>> {
    let data = state
        .trips
        .update_participant(body.user_id, body.trip_id, true, body.by_captain)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/trips/leave
///
/// Self-leave removes the membership; with `byCaptain` it is kept as kicked.
pub async fn leave(
    State(state): State<AppState>,
    Json(body): Json<ParticipantRequest>,
) -> AppResult<Json<DataResponse<TripView>>> {
    let data = state
        .trips
        .update_participant(body.user_id, body.trip_id, false, body.by_captain)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/trip
///
/// Create a trip that has no sheet column. Returns 201.
pub async fn create_trip(
    State(state): State<AppState>,
    Json(body): Json<CreateTripRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TripView>>)> {
    let trip_type = parse_trip_type(&body.trip_type)?;
    let data = state
        .trips
        .create_new_trip(trip_type, body.departure)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

// ── Private helpers ──────────────────────────────────────────────────────

fn parse_trip_type(value: &str) -> AppResult<TripType> {
    TripType::from_str(value).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown trip type '{value}', expected one of: {}",
            TripType::ALL.join(", ")
        ))
    })
}

//! Trip entity model and DTOs.

use orion_core::types::{Timestamp, TripId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `trips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trip {
    pub id: TripId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub trip_type: String,
    pub departure: Timestamp,
    pub duration_minutes: i32,
    pub vessel: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a trip. The id is chosen by the caller (it may already
/// be written into the sheet).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrip {
    pub id: TripId,
    pub trip_type: String,
    pub departure: Timestamp,
    pub duration_minutes: i32,
    pub vessel: String,
    pub status: String,
}

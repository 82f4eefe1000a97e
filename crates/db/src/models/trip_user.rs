//! Crew membership model and DTOs.

use orion_core::types::{Timestamp, TripId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `trip_users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TripUser {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub role: String,
    pub kicked: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTripUser {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub role: String,
}

/// Membership patch. `deleted_at: Some(None)` clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTripUser {
    pub kicked: Option<bool>,
    pub deleted_at: Option<Option<Timestamp>>,
}

/// Active crew member of a trip joined with the user's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TripCrewRow {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
}

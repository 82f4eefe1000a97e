//! Persisted trip and membership state.
//!
//! [`TripStore`] is the seam between the pipeline and persistence.
//! [`postgres::PgTripStore`] is the production implementation;
//! [`memory::InMemoryTripStore`] backs tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate};
use orion_core::activity::{format_duration_hours, CrewRole, TripStatus, TripType};
use orion_core::identity::display_name;
use orion_core::membership::MembershipState;
use orion_core::trip_builder::Trip;
use orion_core::types::{Timestamp, TripId, UserId};
use serde::Serialize;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A persisted trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRecord {
    pub id: TripId,
    pub trip_type: TripType,
    pub departure: Timestamp,
    pub duration_minutes: i32,
    pub vessel: String,
    pub status: TripStatus,
}

impl TripRecord {
    /// Record for a trip built from the sheet.
    pub fn from_built(trip: &Trip) -> Self {
        Self {
            id: trip.id,
            trip_type: trip.trip_type,
            departure: trip.departure,
            duration_minutes: i32::try_from(trip.duration.num_minutes()).unwrap_or(i32::MAX),
            vessel: trip.vessel.clone(),
            status: trip.status,
        }
    }
}

/// A persisted `(trip, user)` membership row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub trip_id: TripId,
    pub user_id: UserId,
    pub role: CrewRole,
    pub kicked: bool,
    pub deleted_at: Option<Timestamp>,
}

impl Membership {
    pub fn state(&self) -> MembershipState {
        MembershipState::of_row(self.kicked, self.deleted_at)
    }

    pub fn is_active(&self) -> bool {
        self.state() == MembershipState::Active
    }
}

/// Partial membership update. `deleted_at: Some(None)` clears the timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipPatch {
    pub kicked: Option<bool>,
    pub deleted_at: Option<Option<Timestamp>>,
}

impl MembershipPatch {
    /// `kicked = false, deleted_at = NULL`.
    pub fn reactivate() -> Self {
        Self {
            kicked: Some(false),
            deleted_at: Some(None),
        }
    }

    /// `kicked = true, deleted_at = at`.
    pub fn kick(at: Timestamp) -> Self {
        Self {
            kicked: Some(true),
            deleted_at: Some(Some(at)),
        }
    }

    /// Apply the patch to a row in place.
    pub fn apply(&self, row: &mut Membership) {
        if let Some(kicked) = self.kicked {
            row.kicked = kicked;
        }
        if let Some(deleted_at) = self.deleted_at {
            row.deleted_at = deleted_at;
        }
    }
}

/// A registered crew user: names for the sheet plus the standing profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub role: CrewRole,
    pub vessel: Option<String>,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Active crew member as shown on a trip card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMemberView {
    pub id: UserId,
    pub name: String,
    pub role: CrewRole,
    /// Localised role label.
    pub position: String,
}

impl CrewMemberView {
    pub fn new(id: UserId, name: String, role: CrewRole) -> Self {
        Self {
            id,
            name,
            role,
            position: role.position().to_string(),
        }
    }
}

/// Trip with its active crew, in the deployment's local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub id: TripId,
    #[serde(rename = "type")]
    pub trip_type: TripType,
    /// `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// `HH:MM`.
    pub departure: String,
    /// Hours, e.g. `"3"` or `"3.5"`.
    pub duration: String,
    pub vessel: String,
    pub status: TripStatus,
    pub crew: Vec<CrewMemberView>,
}

impl TripView {
    pub fn new(record: &TripRecord, crew: Vec<CrewMemberView>, offset: FixedOffset) -> Self {
        let local = record.departure.with_timezone(&offset);
        Self {
            id: record.id,
            trip_type: record.trip_type,
            date: local.date_naive(),
            departure: local.format("%H:%M").to_string(),
            duration: format_duration_hours(record.duration_minutes),
            vessel: record.vessel.clone(),
            status: record.status,
            crew,
        }
    }
}

/// User without an active membership in a given trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeCrewMember {
    pub id: UserId,
    /// `"<last_name> <first_name>"`.
    pub name: String,
    /// Localised label of the user's standing role.
    pub position: String,
    pub vessel: Option<String>,
}

impl From<&CrewUser> for FreeCrewMember {
    fn from(user: &CrewUser) -> Self {
        Self {
            id: user.id,
            name: display_name(&user.first_name, &user.last_name),
            position: user.role.position().to_string(),
            vessel: user.vessel.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Persistence operations the pipeline needs.
///
/// Each call is an individual statement; no call spans a transaction.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn find_trip(&self, id: TripId) -> Result<Option<TripRecord>, StoreError>;

    async fn create_trip(&self, trip: &TripRecord) -> Result<(), StoreError>;

    /// Every membership row of the trip, kicked and soft-deleted included.
    async fn list_memberships(&self, trip_id: TripId) -> Result<Vec<Membership>, StoreError>;

    async fn create_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
        role: CrewRole,
    ) -> Result<(), StoreError>;

    /// Returns `false` when no such membership exists.
    async fn update_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
        patch: &MembershipPatch,
    ) -> Result<bool, StoreError>;

    /// Returns `false` when no such membership exists.
    async fn delete_membership(&self, trip_id: TripId, user_id: UserId)
        -> Result<bool, StoreError>;

    async fn get_trip_view(&self, trip_id: TripId) -> Result<Option<TripView>, StoreError>;

    /// All trips ordered by departure.
    async fn list_trip_views(&self) -> Result<Vec<TripView>, StoreError>;

    async fn list_free_crew(&self, trip_id: TripId) -> Result<Vec<FreeCrewMember>, StoreError>;

    async fn list_users(&self) -> Result<Vec<CrewUser>, StoreError>;
}

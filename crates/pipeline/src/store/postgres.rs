//! [`TripStore`] over the `orion-db` repositories.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::FixedOffset;
use orion_core::activity::{CrewRole, TripStatus, TripType};
use orion_core::identity::display_name;
use orion_core::types::{TripId, UserId};
use orion_db::models::trip::{CreateTrip, Trip as TripRow};
use orion_db::models::trip_user::{CreateTripUser, TripCrewRow, TripUser, UpdateTripUser};
use orion_db::models::user::User;
use orion_db::repositories::{TripRepo, TripUserRepo, UserRepo};
use sqlx::PgPool;

use super::{
    CrewMemberView, CrewUser, FreeCrewMember, Membership, MembershipPatch, TripRecord, TripStore,
    TripView,
};
use crate::error::StoreError;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgTripStore {
    pool: PgPool,
    utc_offset: FixedOffset,
}

impl PgTripStore {
    pub fn new(pool: PgPool, utc_offset: FixedOffset) -> Self {
        Self { pool, utc_offset }
    }

    async fn views_for(&self, rows: Vec<TripRow>) -> Result<Vec<TripView>, StoreError> {
        let ids: Vec<TripId> = rows.iter().map(|t| t.id).collect();
        let crew_rows = TripUserRepo::list_active_crew(&self.pool, &ids).await?;

        let mut crew_by_trip: HashMap<TripId, Vec<CrewMemberView>> = HashMap::new();
        for row in crew_rows {
            crew_by_trip
                .entry(row.trip_id)
                .or_default()
                .push(crew_view(row));
        }

        rows.into_iter()
            .map(|row| {
                let crew = crew_by_trip.remove(&row.id).unwrap_or_default();
                Ok(TripView::new(&record_from_row(row)?, crew, self.utc_offset))
            })
            .collect()
    }
}

fn record_from_row(row: TripRow) -> Result<TripRecord, StoreError> {
    let trip_type = TripType::from_str(&row.trip_type).ok_or_else(|| {
        StoreError::Corrupt(format!("trip {} has unknown type '{}'", row.id, row.trip_type))
    })?;
    let status = TripStatus::from_str(&row.status).ok_or_else(|| {
        StoreError::Corrupt(format!("trip {} has unknown status '{}'", row.id, row.status))
    })?;
    Ok(TripRecord {
        id: row.id,
        trip_type,
        departure: row.departure,
        duration_minutes: row.duration_minutes,
        vessel: row.vessel,
        status,
    })
}

fn membership_from_row(row: TripUser) -> Membership {
    Membership {
        trip_id: row.trip_id,
        user_id: row.user_id,
        role: CrewRole::from_db(&row.role),
        kicked: row.kicked,
        deleted_at: row.deleted_at,
    }
}

fn crew_view(row: TripCrewRow) -> CrewMemberView {
    CrewMemberView::new(
        row.user_id,
        display_name(&row.first_name, &row.last_name),
        CrewRole::from_db(&row.role),
    )
}

/// Map unique violations to [`StoreError::Conflict`].
fn crew_user(user: User) -> CrewUser {
    CrewUser {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        role: CrewRole::from_db(&user.role),
        vessel: user.vessel,
    }
}

fn classify(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    let is_unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);
    if is_unique {
        StoreError::Conflict(what())
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl TripStore for PgTripStore {
    async fn find_trip(&self, id: TripId) -> Result<Option<TripRecord>, StoreError> {
        TripRepo::find_by_id(&self.pool, id)
            .await?
            .map(record_from_row)
            .transpose()
    }

    async fn create_trip(&self, trip: &TripRecord) -> Result<(), StoreError> {
        let input = CreateTrip {
            id: trip.id,
            trip_type: trip.trip_type.as_str().to_string(),
            departure: trip.departure,
            duration_minutes: trip.duration_minutes,
            vessel: trip.vessel.clone(),
            status: trip.status.as_str().to_string(),
        };
        TripRepo::create(&self.pool, &input)
            .await
            .map_err(|e| classify(e, || format!("trip {} already exists", trip.id)))?;
        Ok(())
    }

    async fn list_memberships(&self, trip_id: TripId) -> Result<Vec<Membership>, StoreError> {
        let rows = TripUserRepo::list_for_trip(&self.pool, trip_id).await?;
        Ok(rows.into_iter().map(membership_from_row).collect())
    }

    async fn create_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
        role: CrewRole,
    ) -> Result<(), StoreError> {
        let input = CreateTripUser {
            trip_id,
            user_id,
            role: role.as_str().to_string(),
        };
        TripUserRepo::create(&self.pool, &input).await.map_err(|e| {
            classify(e, || {
                format!("user {user_id} already has a membership in trip {trip_id}")
            })
        })?;
        Ok(())
    }

    async fn update_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
        patch: &MembershipPatch,
    ) -> Result<bool, StoreError> {
        let input = UpdateTripUser {
            kicked: patch.kicked,
            deleted_at: patch.deleted_at,
        };
        let row = TripUserRepo::update(&self.pool, trip_id, user_id, &input).await?;
        Ok(row.is_some())
    }

    async fn delete_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
    ) -> Result<bool, StoreError> {
        Ok(TripUserRepo::delete(&self.pool, trip_id, user_id).await?)
    }

    async fn get_trip_view(&self, trip_id: TripId) -> Result<Option<TripView>, StoreError> {
        let Some(row) = TripRepo::find_by_id(&self.pool, trip_id).await? else {
            return Ok(None);
        };
        Ok(self.views_for(vec![row]).await?.pop())
    }

    async fn list_trip_views(&self) -> Result<Vec<TripView>, StoreError> {
        let rows = TripRepo::list(&self.pool).await?;
        self.views_for(rows).await
    }

    async fn list_free_crew(&self, trip_id: TripId) -> Result<Vec<FreeCrewMember>, StoreError> {
        let users = UserRepo::list_free_for_trip(&self.pool, trip_id).await?;
        Ok(users
            .into_iter()
            .map(|u| FreeCrewMember::from(&crew_user(u)))
            .collect())
    }

    async fn list_users(&self) -> Result<Vec<CrewUser>, StoreError> {
        let users = UserRepo::list(&self.pool).await?;
        Ok(users.into_iter().map(crew_user).collect())
    }
}

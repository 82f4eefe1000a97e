//! In-process [`TripStore`] for tests.
//!
//! Mirrors the database constraints that matter to the pipeline: one trip per
//! id and one membership row per `(trip, user)`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::FixedOffset;
use orion_core::activity::CrewRole;
use orion_core::identity::display_name;
use orion_core::trip_builder::offset_from_hours;
use orion_core::types::{TripId, UserId};
use tokio::sync::RwLock;

use super::{
    CrewMemberView, CrewUser, FreeCrewMember, Membership, MembershipPatch, TripRecord, TripStore,
    TripView,
};
use crate::error::StoreError;

#[derive(Default)]
struct State {
    trips: BTreeMap<TripId, TripRecord>,
    /// Insertion order doubles as join order.
    memberships: Vec<Membership>,
    users: BTreeMap<UserId, CrewUser>,
}

pub struct InMemoryTripStore {
    state: RwLock<State>,
    utc_offset: FixedOffset,
    fail_trip_creates: AtomicBool,
}

impl Default for InMemoryTripStore {
    fn default() -> Self {
        Self::new(offset_from_hours(3))
    }
}

impl InMemoryTripStore {
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self {
            state: RwLock::new(State::default()),
            utc_offset,
            fail_trip_creates: AtomicBool::new(false),
        }
    }

    /// Register a crew user with the default `crew` role and no vessel.
    pub async fn add_user(&self, id: UserId, first_name: &str, last_name: &str) {
        self.add_crew_user(CrewUser {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role: CrewRole::Crew,
            vessel: None,
        })
        .await;
    }

    pub async fn add_crew_user(&self, user: CrewUser) {
        self.state.write().await.users.insert(user.id, user);
    }

    /// Make subsequent `create_trip` calls fail (or succeed again).
    pub fn set_fail_trip_creates(&self, fail: bool) {
        self.fail_trip_creates.store(fail, Ordering::SeqCst);
    }

    pub async fn trip_count(&self) -> usize {
        self.state.read().await.trips.len()
    }

    /// Every membership row, oldest first.
    pub async fn memberships(&self) -> Vec<Membership> {
        self.state.read().await.memberships.clone()
    }

    pub async fn membership(&self, trip_id: TripId, user_id: UserId) -> Option<Membership> {
        self.state
            .read()
            .await
            .memberships
            .iter()
            .find(|m| m.trip_id == trip_id && m.user_id == user_id)
            .cloned()
    }

    fn view(&self, state: &State, trip: &TripRecord) -> TripView {
        let crew = state
            .memberships
            .iter()
            .filter(|m| m.trip_id == trip.id && m.is_active())
            .filter_map(|m| {
                let user = state.users.get(&m.user_id)?;
                Some(CrewMemberView::new(
                    m.user_id,
                    display_name(&user.first_name, &user.last_name),
                    m.role,
                ))
            })
            .collect();
        TripView::new(trip, crew, self.utc_offset)
    }
}

#[async_trait]
impl TripStore for InMemoryTripStore {
    async fn find_trip(&self, id: TripId) -> Result<Option<TripRecord>, StoreError> {
        Ok(self.state.read().await.trips.get(&id).cloned())
    }

    async fn create_trip(&self, trip: &TripRecord) -> Result<(), StoreError> {
        if self.fail_trip_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("trip inserts disabled".into()));
        }
        let mut state = self.state.write().await;
        if state.trips.contains_key(&trip.id) {
            return Err(StoreError::Conflict(format!("trip {} already exists", trip.id)));
        }
        state.trips.insert(trip.id, trip.clone());
        Ok(())
    }

    async fn list_memberships(&self, trip_id: TripId) -> Result<Vec<Membership>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .iter()
            .filter(|m| m.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn create_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
        role: CrewRole,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.trips.contains_key(&trip_id) {
            return Err(StoreError::Conflict(format!("trip {trip_id} does not exist")));
        }
        if !state.users.contains_key(&user_id) {
            return Err(StoreError::Conflict(format!("user {user_id} is not registered")));
        }
        if state
            .memberships
            .iter()
            .any(|m| m.trip_id == trip_id && m.user_id == user_id)
        {
            return Err(StoreError::Conflict(format!(
                "user {user_id} already has a membership in trip {trip_id}"
            )));
        }
        state.memberships.push(Membership {
            trip_id,
            user_id,
            role,
            kicked: false,
            deleted_at: None,
        });
        Ok(())
    }

    async fn update_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
        patch: &MembershipPatch,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state
            .memberships
            .iter_mut()
            .find(|m| m.trip_id == trip_id && m.user_id == user_id)
        {
            Some(row) => {
                patch.apply(row);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_membership(
        &self,
        trip_id: TripId,
        user_id: UserId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let before = state.memberships.len();
        state
            .memberships
            .retain(|m| !(m.trip_id == trip_id && m.user_id == user_id));
        Ok(state.memberships.len() < before)
    }

    async fn get_trip_view(&self, trip_id: TripId) -> Result<Option<TripView>, StoreError> {
        let state = self.state.read().await;
        Ok(state.trips.get(&trip_id).map(|t| self.view(&state, t)))
    }

    async fn list_trip_views(&self) -> Result<Vec<TripView>, StoreError> {
        let state = self.state.read().await;
        let mut trips: Vec<&TripRecord> = state.trips.values().collect();
        trips.sort_by_key(|t| (t.departure, t.id));
        Ok(trips.into_iter().map(|t| self.view(&state, t)).collect())
    }

    async fn list_free_crew(&self, trip_id: TripId) -> Result<Vec<FreeCrewMember>, StoreError> {
        let state = self.state.read().await;
        let mut free: Vec<&CrewUser> = state
            .users
            .values()
            .filter(|u| {
                !state
                    .memberships
                    .iter()
                    .any(|m| m.trip_id == trip_id && m.user_id == u.id && m.is_active())
            })
            .collect();
        free.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(free.into_iter().map(FreeCrewMember::from).collect())
    }

    async fn list_users(&self) -> Result<Vec<CrewUser>, StoreError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }
}

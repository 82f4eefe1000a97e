//! Additive reconciliation of built trips into the store.
//!
//! Trips and memberships missing from the store are created; nothing that
//! already exists is updated or removed. A kicked or soft-deleted membership
//! counts as existing, so the sheet never silently re-adds a removed member.

use std::collections::HashSet;

use orion_core::trip_builder::Trip;
use orion_core::types::UserId;
use serde::Serialize;

use crate::store::{TripRecord, TripStore};

/// Counters of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub trips_seen: usize,
    pub trips_created: usize,
    pub memberships_created: usize,
    /// Store calls that failed and were skipped.
    pub failures: usize,
}

/// Persist `trips`, one trip at a time.
pub async fn reconcile(store: &dyn TripStore, trips: &[Trip]) -> SyncReport {
    let mut report = SyncReport {
        trips_seen: trips.len(),
        ..Default::default()
    };

    for trip in trips {
        match store.find_trip(trip.id).await {
            Ok(Some(_)) => {}
            Ok(None) => match store.create_trip(&TripRecord::from_built(trip)).await {
                Ok(()) => {
                    report.trips_created += 1;
                    tracing::info!(
                        trip_id = %trip.id,
                        trip_type = %trip.trip_type,
                        date = %trip.date,
                        "Created trip",
                    );
                }
                Err(e) => {
                    report.failures += 1;
                    tracing::error!(trip_id = %trip.id, error = %e, "Failed to create trip");
                    continue;
                }
            },
            Err(e) => {
                report.failures += 1;
                tracing::error!(trip_id = %trip.id, error = %e, "Failed to look up trip");
                continue;
            }
        }

        let existing: HashSet<UserId> = match store.list_memberships(trip.id).await {
            Ok(rows) => rows.into_iter().map(|m| m.user_id).collect(),
            Err(e) => {
                report.failures += 1;
                tracing::error!(trip_id = %trip.id, error = %e, "Failed to list memberships");
                continue;
            }
        };

        for member in trip.crew.iter().filter(|c| !existing.contains(&c.user_id)) {
            match store
                .create_membership(trip.id, member.user_id, member.role)
                .await
            {
                Ok(()) => {
                    report.memberships_created += 1;
                    tracing::debug!(
                        trip_id = %trip.id,
                        user_id = member.user_id,
                        role = %member.role,
                        "Added crew member",
                    );
                }
                Err(e) => {
                    report.failures += 1;
                    tracing::error!(
                        trip_id = %trip.id,
                        user_id = member.user_id,
                        error = %e,
                        "Failed to add crew member",
                    );
                }
            }
        }
    }

    report
}

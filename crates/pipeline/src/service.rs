//! Owned trip service: cache, periodic sync and the collaborator operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use orion_core::activity::TripType;
use orion_core::error::CoreError;
use orion_core::identity::{display_name, IdentityTable};
use orion_core::membership::Mark;
use orion_core::types::{Timestamp, TripId, UserId};
use orion_sheets::GridSource;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::SyncConfig;
use crate::error::PipelineError;
use crate::mutator;
use crate::reconciler::SyncReport;
use crate::store::{FreeCrewMember, TripRecord, TripStore, TripView};
use crate::sync::{run_sync, SyncContext};

/// Where sheet display names come from.
#[derive(Debug, Clone)]
pub enum IdentitySource {
    /// A fixed directory loaded at startup.
    Directory(Arc<IdentityTable>),
    /// Derived from registered users (`"<last> <first>"`) at every run.
    Users,
}

/// Result of an on-demand sync.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutcome {
    pub report: SyncReport,
    pub trips: Vec<TripView>,
}

/// Cache state for status endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub trip_count: usize,
    pub last_updated: Option<Timestamp>,
    pub last_report: Option<SyncReport>,
    pub scheduled: bool,
}

/// Cached trip counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub crew_slots: usize,
}

#[derive(Default)]
struct TripCache {
    trips: Vec<TripView>,
    last_updated: Option<Timestamp>,
    last_report: Option<SyncReport>,
}

struct Schedule {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the collaborators, the trip cache and the periodic sync task.
///
/// Sync runs are not serialised against each other: a scheduled run, a
/// refresh and a mutation may overlap. Two overlapping runs can both mint an
/// id for the same empty id cell; the later sheet write wins and the other
/// trip row is left without a column.
pub struct TripsService {
    source: Arc<dyn GridSource>,
    store: Arc<dyn TripStore>,
    identities: IdentitySource,
    config: SyncConfig,
    cache: RwLock<TripCache>,
    schedule: Mutex<Option<Schedule>>,
}

impl TripsService {
    pub fn new(
        source: Arc<dyn GridSource>,
        store: Arc<dyn TripStore>,
        identities: IdentitySource,
        config: SyncConfig,
    ) -> Self {
        Self {
            source,
            store,
            identities,
            config,
            cache: RwLock::new(TripCache::default()),
            schedule: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    async fn identity_table(&self) -> Result<Arc<IdentityTable>, PipelineError> {
        match &self.identities {
            IdentitySource::Directory(table) => Ok(Arc::clone(table)),
            IdentitySource::Users => {
                let users = self.store.list_users().await?;
                Ok(Arc::new(IdentityTable::from_entries(users.into_iter().map(
                    |u| (display_name(&u.first_name, &u.last_name), u.id),
                ))))
            }
        }
    }

    // ---- sync ----

    /// Run the pipeline once and refresh the cache from the store.
    pub async fn update_trips(&self) -> Result<SyncOutcome, PipelineError> {
        let identities = self.identity_table().await?;
        let ctx = SyncContext {
            source: self.source.as_ref(),
            store: self.store.as_ref(),
            identities: &identities,
            config: &self.config,
        };
        let report = run_sync(ctx).await?;
        let trips = self.refresh_cache(Some(report.clone())).await?;
        Ok(SyncOutcome { report, trips })
    }

    async fn refresh_cache(
        &self,
        report: Option<SyncReport>,
    ) -> Result<Vec<TripView>, PipelineError> {
        let trips = self.store.list_trip_views().await?;
        let mut cache = self.cache.write().await;
        cache.trips = trips.clone();
        cache.last_updated = Some(Utc::now());
        if report.is_some() {
            cache.last_report = report;
        }
        Ok(trips)
    }

    // ---- reads ----

    /// Cached trips ordered by departure.
    pub async fn get_trips(&self) -> Vec<TripView> {
        self.cache.read().await.trips.clone()
    }

    pub async fn trips_on(&self, date: NaiveDate) -> Vec<TripView> {
        self.filtered(|t| t.date == date).await
    }

    pub async fn trips_of_type(&self, trip_type: TripType) -> Vec<TripView> {
        self.filtered(|t| t.trip_type == trip_type).await
    }

    /// Cached trips with `from <= date <= to`.
    pub async fn trips_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<TripView> {
        self.filtered(|t| t.date >= from && t.date <= to).await
    }

    async fn filtered(&self, keep: impl Fn(&TripView) -> bool) -> Vec<TripView> {
        self.cache
            .read()
            .await
            .trips
            .iter()
            .filter(|t| keep(t))
            .cloned()
            .collect()
    }

    pub async fn status(&self) -> SyncStatus {
        let cache = self.cache.read().await;
        SyncStatus {
            trip_count: cache.trips.len(),
            last_updated: cache.last_updated,
            last_report: cache.last_report.clone(),
            scheduled: self.schedule.lock().await.is_some(),
        }
    }

    pub async fn stats(&self) -> TripStats {
        let cache = self.cache.read().await;
        let mut stats = TripStats {
            total: cache.trips.len(),
            ..Default::default()
        };
        for trip in &cache.trips {
            *stats
                .by_type
                .entry(trip.trip_type.as_str().to_string())
                .or_default() += 1;
            *stats
                .by_status
                .entry(trip.status.as_str().to_string())
                .or_default() += 1;
            stats.crew_slots += trip.crew.len();
        }
        stats
    }

    /// Users without an active membership in the trip.
    pub async fn get_free_crew(
        &self,
        trip_id: TripId,
    ) -> Result<Vec<FreeCrewMember>, PipelineError> {
        if self.store.find_trip(trip_id).await?.is_none() {
            return Err(CoreError::trip_not_found(trip_id).into());
        }
        Ok(self.store.list_free_crew(trip_id).await?)
    }

    // ---- writes ----

    /// Persist a trip that has no sheet column.
    pub async fn create_new_trip(
        &self,
        trip_type: TripType,
        departure: Timestamp,
    ) -> Result<TripView, PipelineError> {
        let schedule = trip_type.schedule();
        let date = departure
            .with_timezone(&self.config.defaults.utc_offset)
            .date_naive();
        let record = TripRecord {
            id: uuid::Uuid::new_v4(),
            trip_type,
            departure,
            duration_minutes: i32::try_from(schedule.duration.num_minutes()).unwrap_or(i32::MAX),
            vessel: self.config.defaults.vessel.clone(),
            status: self.config.defaults.status_on(date, Utc::now()),
        };
        self.store.create_trip(&record).await?;
        tracing::info!(trip_id = %record.id, trip_type = %trip_type, %departure, "Created trip");

        self.refresh_cache(None).await?;
        self.store
            .get_trip_view(record.id)
            .await?
            .ok_or_else(|| CoreError::trip_not_found(record.id).into())
    }

    /// Join (`present`) or leave a trip. `by_captain` turns a leave into a kick.
    pub async fn update_participant(
        &self,
        user_id: UserId,
        trip_id: TripId,
        present: bool,
        by_captain: bool,
    ) -> Result<TripView, PipelineError> {
        let identities = self.identity_table().await?;
        let ctx = SyncContext {
            source: self.source.as_ref(),
            store: self.store.as_ref(),
            identities: &identities,
            config: &self.config,
        };
        let mark = Mark::from_present(present);
        let view = mutator::update_participant(ctx, user_id, trip_id, mark, by_captain).await?;
        self.refresh_cache(None).await?;
        Ok(view)
    }

    // ---- schedule ----

    /// Start the periodic sync. The first run happens immediately. Calling
    /// `start` while already scheduled is a no-op.
    pub async fn start(self: &Arc<Self>) {
        let mut schedule = self.schedule.lock().await;
        if schedule.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let service = Arc::clone(self);
        let token = cancel.clone();
        let handle = tokio::spawn(async move { service.run_schedule(token).await });

        *schedule = Some(Schedule { cancel, handle });
    }

    /// Stop scheduling runs. A run already in progress finishes first.
    pub async fn stop(&self) {
        let Some(schedule) = self.schedule.lock().await.take() else {
            return;
        };
        schedule.cancel.cancel();
        if let Err(e) = schedule.handle.await {
            tracing::error!(error = %e, "Trip sync task ended abnormally");
        }
    }

    async fn run_schedule(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            "Trip sync job started"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Trip sync job stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.update_trips().await {
                        Ok(outcome) => tracing::debug!(
                            trips = outcome.trips.len(),
                            "Scheduled trip sync finished",
                        ),
                        Err(e) => tracing::error!(error = %e, "Scheduled trip sync failed"),
                    }
                }
            }
        }
    }
}


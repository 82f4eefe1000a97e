//! One full pipeline run: fetch, parse, build, reconcile.

use chrono::Utc;
use orion_core::attendance::registrations;
use orion_core::header::month_ranges;
use orion_core::identity::IdentityTable;
use orion_core::trip_builder::build_trips;
use orion_sheets::GridSource;

use crate::config::SyncConfig;
use crate::error::PipelineError;
use crate::reconciler::{reconcile, SyncReport};
use crate::resolver::resolve_columns;
use crate::store::TripStore;

/// Collaborators of a run, borrowed for its duration.
#[derive(Clone, Copy)]
pub struct SyncContext<'a> {
    pub source: &'a dyn GridSource,
    pub store: &'a dyn TripStore,
    pub identities: &'a IdentityTable,
    pub config: &'a SyncConfig,
}

/// Run the pipeline once.
///
/// Only a failed grid fetch fails the run; everything later degrades per
/// column, per trip or per membership and is logged.
pub async fn run_sync(ctx: SyncContext<'_>) -> Result<SyncReport, PipelineError> {
    let grid = ctx.source.fetch_grid().await?;
    let layout = &ctx.config.layout;

    let ranges = month_ranges(&grid, layout.month_row);
    let columns = resolve_columns(&grid, &ranges, ctx.source, ctx.config).await;
    let regs = registrations(&grid, layout.participant_rows.clone(), columns);
    let trips = build_trips(regs, ctx.identities, &ctx.config.defaults, Utc::now());

    let report = reconcile(ctx.store, &trips).await;
    tracing::info!(
        trips_seen = report.trips_seen,
        trips_created = report.trips_created,
        memberships_created = report.memberships_created,
        failures = report.failures,
        "Sync run finished",
    );
    Ok(report)
}

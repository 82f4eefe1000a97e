use std::sync::Arc;

use orion_pipeline::TripsService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: orion_db::DbPool,
    /// Trip cache, sync schedule and crew mutations.
    pub trips: Arc<TripsService>,
}

//! Sheet-to-store synchronisation.
//!
//! One run fetches the grid once, resolves activity columns (writing
//! generated ids back into the sheet), scans attendance, builds trips and
//! additively reconciles them into the [`store::TripStore`].
//! [`mutator`] applies direct join/leave/kick requests to both sides and then
//! runs the same pipeline. [`service::TripsService`] owns the cache and the
//! periodic schedule.

pub mod config;
pub mod error;
pub mod mutator;
pub mod reconciler;
pub mod resolver;
pub mod service;
pub mod store;
pub mod sync;

pub use config::SyncConfig;
pub use error::{PipelineError, StoreError};
pub use service::TripsService;

use orion_core::error::CoreError;
use orion_sheets::GridError;

/// Errors from a [`TripStore`](crate::store::TripStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored value could not be mapped back to a domain type.
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Injected failure (in-memory store only).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by a sync run or a membership mutation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

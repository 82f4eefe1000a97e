use crate::types::TripId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl CoreError {
    /// Shorthand for a missing trip.
    pub fn trip_not_found(id: TripId) -> Self {
        Self::NotFound {
            entity: "Trip",
            id: id.to_string(),
        }
    }
}

//! Repository for the `trips` table.

use orion_core::types::TripId;
use sqlx::PgPool;

use crate::models::trip::{CreateTrip, Trip};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, type, departure, duration_minutes, vessel, status, created_at, updated_at";

/// Provides CRUD operations for trips.
pub struct TripRepo;

impl TripRepo {
    /// Insert a trip with a caller-chosen id, returning the created row.
    ///
    /// A duplicate id is a unique violation (`23505`).
    pub async fn create(pool: &PgPool, input: &CreateTrip) -> Result<Trip, sqlx::Error> {
        let query = format!(
            "INSERT INTO trips (id, type, departure, duration_minutes, vessel, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trip>(&query)
            .bind(input.id)
            .bind(&input.trip_type)
            .bind(input.departure)
            .bind(input.duration_minutes)
            .bind(&input.vessel)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: TripId) -> Result<Option<Trip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trips WHERE id = $1");
        sqlx::query_as::<_, Trip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all trips ordered by departure, earliest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Trip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trips ORDER BY departure ASC, id ASC");
        sqlx::query_as::<_, Trip>(&query).fetch_all(pool).await
    }
}

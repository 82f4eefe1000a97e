//! Repository for the `trip_users` membership table.

use orion_core::types::{TripId, UserId};
use sqlx::PgPool;

use crate::models::trip_user::{CreateTripUser, TripCrewRow, TripUser, UpdateTripUser};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "trip_id, user_id, role, kicked, deleted_at, created_at, updated_at";

/// Provides CRUD operations for crew memberships.
pub struct TripUserRepo;

impl TripUserRepo {
    /// Insert an active membership.
    ///
    /// The `(trip_id, user_id)` primary key rejects a second row (`23505`).
    pub async fn create(pool: &PgPool, input: &CreateTripUser) -> Result<TripUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO trip_users (trip_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TripUser>(&query)
            .bind(input.trip_id)
            .bind(input.user_id)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Every membership row of a trip, kicked ones included.
    pub async fn list_for_trip(
        pool: &PgPool,
        trip_id: TripId,
    ) -> Result<Vec<TripUser>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trip_users WHERE trip_id = $1 \
             ORDER BY created_at ASC, user_id ASC"
        );
        sqlx::query_as::<_, TripUser>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await
    }

    /// Active crew of the given trips with user names, in join order.
    pub async fn list_active_crew(
        pool: &PgPool,
        trip_ids: &[TripId],
    ) -> Result<Vec<TripCrewRow>, sqlx::Error> {
        sqlx::query_as::<_, TripCrewRow>(
            "SELECT tu.trip_id, tu.user_id, tu.role, u.first_name, u.last_name
             FROM trip_users tu
             JOIN users u ON u.id = tu.user_id
             WHERE tu.trip_id = ANY($1)
               AND tu.kicked = false
               AND tu.deleted_at IS NULL
             ORDER BY tu.created_at ASC, tu.user_id ASC",
        )
        .bind(trip_ids)
        .fetch_all(pool)
        .await
    }

    /// Apply a patch. Only non-`None` fields are written.
    ///
    /// Returns `None` if the membership does not exist.
    pub async fn update(
        pool: &PgPool,
        trip_id: TripId,
        user_id: UserId,
        input: &UpdateTripUser,
    ) -> Result<Option<TripUser>, sqlx::Error> {
        let query = format!(
            "UPDATE trip_users SET
                kicked = COALESCE($3, kicked),
                deleted_at = CASE WHEN $4 THEN $5 ELSE deleted_at END
             WHERE trip_id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TripUser>(&query)
            .bind(trip_id)
            .bind(user_id)
            .bind(input.kicked)
            .bind(input.deleted_at.is_some())
            .bind(input.deleted_at.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Remove a membership row. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        trip_id: TripId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trip_users WHERE trip_id = $1 AND user_id = $2")
            .bind(trip_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

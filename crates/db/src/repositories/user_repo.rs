//! Repository for the `users` table.

use orion_core::types::{TripId, UserId};
use sqlx::PgPool;

use crate::models::user::{UpsertUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, username, avatar, language_code, role, \
                       vessel, deleted_at, created_at, updated_at";

/// Provides CRUD operations for crew users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a user or refresh the profile fields of an existing one.
    ///
    /// Re-registering a soft-deleted user restores them.
    pub async fn upsert(pool: &PgPool, input: &UpsertUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, first_name, last_name, username, avatar, language_code, vessel)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                username = EXCLUDED.username,
                avatar = COALESCE(EXCLUDED.avatar, users.avatar),
                language_code = COALESCE(EXCLUDED.language_code, users.language_code),
                vessel = COALESCE(EXCLUDED.vessel, users.vessel),
                deleted_at = NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.username)
            .bind(&input.avatar)
            .bind(&input.language_code)
            .bind(&input.vessel)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List users that are not soft-deleted, by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE deleted_at IS NULL
             ORDER BY last_name ASC, first_name ASC, id ASC"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Users without an active membership in the trip.
    ///
    /// Kicked and soft-deleted members count as free.
    pub async fn list_free_for_trip(
        pool: &PgPool,
        trip_id: TripId,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u
             WHERE u.deleted_at IS NULL
               AND NOT EXISTS (
                   SELECT 1 FROM trip_users tu
                   WHERE tu.trip_id = $1
                     AND tu.user_id = u.id
                     AND tu.kicked = false
                     AND tu.deleted_at IS NULL
               )
             ORDER BY u.last_name ASC, u.first_name ASC, u.id ASC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(trip_id)
            .fetch_all(pool)
            .await
    }
}

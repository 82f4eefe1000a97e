//! Handlers for crew user registration.

use axum::extract::{Path, State};
use axum::Json;
use orion_core::error::CoreError;
use orion_core::types::UserId;
use orion_db::models::user::{UpsertUser, User};
use orion_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users
///
/// Register a crew member or refresh their profile. The id is the messenger
/// user id, so repeating the call is safe.
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(input): Json<UpsertUser>,
) -> AppResult<Json<DataResponse<User>>> {
    if input.first_name.trim().is_empty() && input.last_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A user needs a first or last name".to_string(),
        )));
    }
    let user = UserRepo::upsert(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, "Registered user");
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "User",
            id: id.to_string(),
        })?;
    Ok(Json(DataResponse { data: user }))
}

//! Direct join / leave / kick requests.
//!
//! A request writes the attendance mark into the sheet, applies the
//! membership transition to the store and then re-runs the pipeline so both
//! sides converge. A failed sheet write leaves the store change in place; the
//! next successful write or run repairs the divergence.

use chrono::Utc;
use orion_core::activity::CrewRole;
use orion_core::error::CoreError;
use orion_core::grid::CellRange;
use orion_core::membership::{transition, Mark, MembershipAction, MembershipState};
use orion_core::types::{TripId, UserId};

use crate::error::PipelineError;
use crate::store::{MembershipPatch, TripView};
use crate::sync::{run_sync, SyncContext};

/// Apply `mark` for `user_id` on `trip_id` and return the refreshed view.
///
/// Fails with [`CoreError::NotFound`] when the trip is not persisted. When the
/// user has no sheet name or the trip has no sheet column, nothing is changed
/// beyond ensuring the membership row and the current view is returned.
pub async fn update_participant(
    ctx: SyncContext<'_>,
    user_id: UserId,
    trip_id: TripId,
    mark: Mark,
    by_captain: bool,
) -> Result<TripView, PipelineError> {
    let store = ctx.store;
    let name = ctx.identities.name_for(user_id);

    if store.find_trip(trip_id).await?.is_none() {
        return Err(CoreError::trip_not_found(trip_id).into());
    }

    let mut membership = store
        .list_memberships(trip_id)
        .await?
        .into_iter()
        .find(|m| m.user_id == user_id);

    if membership.is_none() {
        let role = role_for(ctx, user_id);
        store.create_membership(trip_id, user_id, role).await?;
        tracing::info!(%trip_id, user_id, role = %role, "Linked user to trip");
        membership = store
            .list_memberships(trip_id)
            .await?
            .into_iter()
            .find(|m| m.user_id == user_id);
    }

    let layout = &ctx.config.layout;
    let grid = ctx.source.fetch_grid().await?;
    let column = grid.find_in_row(layout.id_row, &trip_id.to_string());
    let row = name.and_then(|n| grid.find_in_first_column(layout.participant_rows.clone(), n));

    let (Some(column), Some(row)) = (column, row) else {
        tracing::info!(
            %trip_id,
            user_id,
            has_name = name.is_some(),
            has_column = column.is_some(),
            "Cannot place participant in sheet, returning current trip",
        );
        return current_view(ctx, trip_id).await;
    };

    let range = CellRange::new(&ctx.config.sheet_name, column, row);
    if let Err(e) = ctx.source.write_cell(&range, mark.cell_value()).await {
        tracing::error!(range = %range, error = %e, "Failed to write attendance mark");
    }

    let state = membership
        .as_ref()
        .map_or(MembershipState::Absent, |m| m.state());
    let action = transition(state, mark, by_captain);
    apply_action(ctx, trip_id, user_id, action).await?;
    tracing::info!(
        %trip_id,
        user_id,
        ?mark,
        by_captain,
        ?action,
        "Updated participant",
    );

    run_sync(ctx).await?;
    current_view(ctx, trip_id).await
}

async fn apply_action(
    ctx: SyncContext<'_>,
    trip_id: TripId,
    user_id: UserId,
    action: MembershipAction,
) -> Result<(), PipelineError> {
    let store = ctx.store;
    match action {
        MembershipAction::Insert => {
            store
                .create_membership(trip_id, user_id, role_for(ctx, user_id))
                .await?;
        }
        MembershipAction::Reactivate => {
            store
                .update_membership(trip_id, user_id, &MembershipPatch::reactivate())
                .await?;
        }
        MembershipAction::Kick => {
            store
                .update_membership(trip_id, user_id, &MembershipPatch::kick(Utc::now()))
                .await?;
        }
        MembershipAction::Remove => {
            store.delete_membership(trip_id, user_id).await?;
        }
        MembershipAction::Nothing => {}
    }
    Ok(())
}

/// Boatswain override by sheet name; unnamed users join as crew.
fn role_for(ctx: SyncContext<'_>, user_id: UserId) -> CrewRole {
    ctx.identities
        .name_for(user_id)
        .map_or(CrewRole::Crew, |n| ctx.config.defaults.role_for(n))
}

async fn current_view(ctx: SyncContext<'_>, trip_id: TripId) -> Result<TripView, PipelineError> {
    ctx.store
        .get_trip_view(trip_id)
        .await?
        .ok_or_else(|| CoreError::trip_not_found(trip_id).into())
}

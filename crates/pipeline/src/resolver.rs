//! Activity column resolution with id write-back.
//!
//! Columns are resolved against the snapshot fetched at the start of the run.
//! Generated ids are written to the sheet as they are minted; a failed write
//! is logged and the id is still used for this run. A column whose activity
//! cell was cleared gets its id cell cleared too.

use orion_core::calendar::{compose_date, month_number, parse_day};
use orion_core::column::{ActivityColumn, ColumnCells, ColumnMap, IdCell};
use orion_core::grid::{CellRange, ColumnKey, Grid};
use orion_core::header::MonthRange;
use orion_core::layout::ABSENCE_MARK;
use orion_sheets::GridSource;
use uuid::Uuid;

use crate::config::SyncConfig;

/// Resolve every column of `ranges` into an [`ActivityColumn`].
pub async fn resolve_columns(
    grid: &Grid,
    ranges: &[MonthRange],
    source: &dyn GridSource,
    config: &SyncConfig,
) -> ColumnMap {
    let mut columns = ColumnMap::new();

    for range in ranges {
        let Some(month) = month_number(&range.label) else {
            tracing::warn!(
                label = %range.label,
                from = %range.from,
                "Unknown month label, skipping range"
            );
            continue;
        };

        for column in range.columns() {
            if let Some(activity) = resolve_column(grid, column, month, source, config).await {
                columns.insert(column, activity);
            }
        }
    }

    tracing::debug!(columns = columns.len(), "Resolved activity columns");
    columns
}

async fn resolve_column(
    grid: &Grid,
    column: ColumnKey,
    month: u32,
    source: &dyn GridSource,
    config: &SyncConfig,
) -> Option<ActivityColumn> {
    let layout = &config.layout;
    let cells = ColumnCells::read(grid, layout, column);
    let id_range = CellRange::new(&config.sheet_name, column, layout.id_row);

    let Some(code) = cells.activity_code() else {
        // Only a trip id is cleared; free text in the id row is left alone.
        if matches!(cells.id_cell(), IdCell::Present(_)) {
            match source.write_cell(&id_range, ABSENCE_MARK).await {
                Ok(()) => tracing::info!(range = %id_range, "Cleared id of inactive column"),
                Err(e) => {
                    tracing::error!(range = %id_range, error = %e, "Failed to clear stale id")
                }
            }
        }
        return None;
    };

    let id = match cells.id_cell() {
        IdCell::Present(id) => id,
        IdCell::Empty => {
            let id = Uuid::new_v4();
            match source.write_cell(&id_range, &id.to_string()).await {
                Ok(()) => tracing::info!(range = %id_range, trip_id = %id, "Assigned trip id"),
                Err(e) => tracing::error!(
                    range = %id_range,
                    trip_id = %id,
                    error = %e,
                    "Failed to write trip id, using it for this run only",
                ),
            }
            id
        }
        IdCell::Malformed(text) => {
            tracing::warn!(
                range = %id_range,
                value = %text,
                "Id cell is not a trip id, skipping column"
            );
            return None;
        }
    };

    let Some(day) = parse_day(cells.day) else {
        tracing::warn!(column = %column, day = %cells.day, "Invalid day cell, skipping column");
        return None;
    };
    let Some(date) = compose_date(config.year, month, day) else {
        tracing::warn!(column = %column, month, day, "Not a calendar date, skipping column");
        return None;
    };

    Some(ActivityColumn::new(id, date, code))
}

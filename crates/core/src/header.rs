//! Month header parsing.
//!
//! The month row holds merged cells: a label appears once, in the leftmost
//! column of its run, and the following columns of the run are empty.

use crate::grid::{ColumnKey, Grid};

/// Contiguous span of columns sharing one month label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    /// Lower-cased, trimmed label.
    pub label: String,
    pub from: ColumnKey,
    pub to: ColumnKey,
}

impl MonthRange {
    /// Columns of the range, left to right.
    pub fn columns(&self) -> impl Iterator<Item = ColumnKey> {
        ColumnKey::span(self.from, self.to)
    }
}

/// Split a header row into month ranges.
///
/// `width` is the number of columns the grid spans; the last range is closed
/// at `max(header.len(), width) - 1`. Ranges come back ordered by column and
/// partition `[first label, last column]`.
pub fn parse_month_ranges(header: &[String], width: usize) -> Vec<MonthRange> {
    let width = width.max(header.len());
    let mut ranges: Vec<MonthRange> = Vec::new();

    for (index, cell) in header.iter().enumerate() {
        let label = cell.trim();
        if label.is_empty() {
            continue;
        }
        let column = ColumnKey::at(index);
        if let (Some(open), Some(prev)) = (ranges.last_mut(), column.prev()) {
            open.to = prev;
        }
        ranges.push(MonthRange {
            label: label.to_lowercase(),
            from: column,
            to: column,
        });
    }

    if let Some(last) = ranges.last_mut() {
        last.to = ColumnKey::at(width - 1);
    }

    ranges
}

/// Month ranges of a grid's header row.
pub fn month_ranges(grid: &Grid, month_row: usize) -> Vec<MonthRange> {
    parse_month_ranges(grid.row(month_row), grid.width())
}

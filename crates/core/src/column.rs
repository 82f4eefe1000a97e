//! Per-column interpretation of the header block.
//!
//! The async resolver in `orion-pipeline` walks month ranges and performs
//! id write-backs; the cell-level decisions it makes live here so they can be
//! tested without I/O.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::grid::{ColumnKey, Grid};
use crate::layout::GridLayout;
use crate::types::TripId;

/// An active sheet column: one scheduled trip instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityColumn {
    pub id: TripId,
    pub date: NaiveDate,
    /// Raw code from the activity row (e.g. `"Т"`).
    pub activity_code: String,
    /// Display names marked present, in first-seen order, no duplicates.
    pub participants: Vec<String>,
}

impl ActivityColumn {
    pub fn new(id: TripId, date: NaiveDate, activity_code: impl Into<String>) -> Self {
        Self {
            id,
            date,
            activity_code: activity_code.into(),
            participants: Vec::new(),
        }
    }
}

/// Resolved columns keyed by column handle.
pub type ColumnMap = BTreeMap<ColumnKey, ActivityColumn>;

/// Header cells of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCells<'a> {
    pub day: &'a str,
    pub id: &'a str,
    pub activity: &'a str,
}

impl<'a> ColumnCells<'a> {
    pub fn read(grid: &'a Grid, layout: &GridLayout, column: ColumnKey) -> Self {
        Self {
            day: grid.cell(layout.day_row, column),
            id: grid.cell(layout.id_row, column),
            activity: grid.cell(layout.activity_row, column),
        }
    }

    /// Trimmed activity code, `None` when the column is inactive.
    pub fn activity_code(&self) -> Option<&'a str> {
        let code = self.activity.trim();
        (!code.is_empty()).then_some(code)
    }

    pub fn id_cell(&self) -> IdCell {
        IdCell::parse(self.id)
    }
}

/// State of a column's id cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdCell {
    Empty,
    Present(TripId),
    /// Non-empty text that is not an id this system wrote.
    Malformed(String),
}

impl IdCell {
    pub fn parse(cell: &str) -> Self {
        let text = cell.trim();
        if text.is_empty() {
            return Self::Empty;
        }
        match uuid::Uuid::parse_str(text) {
            Ok(id) => Self::Present(id),
            Err(_) => Self::Malformed(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_grid() -> Grid {
        let id = "6f1f3c1e-2b7a-4c55-9a51-0e2f3f6e9d10";
        Grid::from_rows([
            vec!["", "март", ""],
            vec!["", "", ""],
            vec!["", "5", "6"],
            vec!["", "", ""],
            vec!["", id, ""],
            vec!["", "Т", "  "],
        ])
    }

    #[test]
    fn reads_cells_by_layout() {
        let grid = layout_grid();
        let layout = GridLayout::default();
        let col = grid.find_in_row(0, "март").unwrap();
        let cells = ColumnCells::read(&grid, &layout, col);
        assert_eq!(cells.day, "5");
        assert_eq!(cells.activity_code(), Some("Т"));
        assert!(matches!(cells.id_cell(), IdCell::Present(_)));
    }

    #[test]
    fn whitespace_activity_is_inactive() {
        let grid = layout_grid();
        let layout = GridLayout::default();
        let col = grid.columns().nth(2).unwrap();
        let cells = ColumnCells::read(&grid, &layout, col);
        assert_eq!(cells.activity_code(), None);
        assert_eq!(cells.id_cell(), IdCell::Empty);
    }

    #[test]
    fn id_cell_states() {
        assert_eq!(IdCell::parse("  "), IdCell::Empty);
        assert_eq!(
            IdCell::parse("not-an-id"),
            IdCell::Malformed("not-an-id".to_string())
        );
        let id = uuid::Uuid::new_v4();
        assert_eq!(IdCell::parse(&format!(" {id} ")), IdCell::Present(id));
    }
}

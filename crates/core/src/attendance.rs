//! Attendance matrix scan.
//!
//! Each participant row starts with a display name; every other cell is either
//! the presence mark or empty.

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::column::ColumnMap;
use crate::grid::{ColumnKey, Grid};
use crate::layout::PRESENCE_MARK;
use crate::types::TripId;

/// An active column with its resolved participant names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRegistration {
    pub column: ColumnKey,
    pub id: TripId,
    pub date: NaiveDate,
    pub activity_code: String,
    pub participants: Vec<String>,
}

/// Record every participant marked present against the columns in `columns`.
///
/// Rows with an empty name cell are skipped. Columns absent from the map are
/// ignored. A name is listed at most once per column.
pub fn scan_attendance(grid: &Grid, rows: RangeInclusive<usize>, columns: &mut ColumnMap) {
    for row in rows {
        let name = grid.cell(row, ColumnKey::FIRST).trim();
        if name.is_empty() {
            continue;
        }

        for (column, activity) in columns.iter_mut() {
            if *column == ColumnKey::FIRST {
                continue;
            }
            if grid.cell(row, *column).trim() != PRESENCE_MARK {
                continue;
            }
            if !activity.participants.iter().any(|p| p == name) {
                activity.participants.push(name.to_string());
            }
        }
    }
}

/// Scan attendance and flatten the map into registrations, in column order.
pub fn registrations(
    grid: &Grid,
    rows: RangeInclusive<usize>,
    mut columns: ColumnMap,
) -> Vec<ActivityRegistration> {
    scan_attendance(grid, rows, &mut columns);
    columns
        .into_iter()
        .map(|(column, activity)| ActivityRegistration {
            column,
            id: activity.id,
            date: activity.date,
            activity_code: activity.activity_code,
            participants: activity.participants,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ActivityColumn;

    fn column_map(grid: &Grid, indices: &[usize]) -> ColumnMap {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        grid.columns()
            .filter(|c| indices.contains(&c.index()))
            .map(|c| (c, ActivityColumn::new(uuid::Uuid::new_v4(), date, "Т")))
            .collect()
    }

    #[test]
    fn marks_first_and_third_columns() {
        let grid = Grid::from_rows([vec!["Иванов", "1", "", "1"]]);
        let mut columns = column_map(&grid, &[1, 2, 3]);
        scan_attendance(&grid, 0..=0, &mut columns);

        let lists: Vec<Vec<String>> = columns.values().map(|c| c.participants.clone()).collect();
        assert_eq!(
            lists,
            vec![
                vec!["Иванов".to_string()],
                vec![],
                vec!["Иванов".to_string()]
            ]
        );
    }

    #[test]
    fn empty_names_are_skipped() {
        let grid = Grid::from_rows([vec!["  ", "1"], vec!["Петров", "1"]]);
        let mut columns = column_map(&grid, &[1]);
        scan_attendance(&grid, 0..=1, &mut columns);
        let only = columns.values().next().unwrap();
        assert_eq!(only.participants, vec!["Петров".to_string()]);
    }

    #[test]
    fn marks_are_trimmed_and_exact() {
        let grid = Grid::from_rows([vec!["Сидоров", " 1 ", "11", "x"]]);
        let mut columns = column_map(&grid, &[1, 2, 3]);
        scan_attendance(&grid, 0..=0, &mut columns);
        let counts: Vec<usize> = columns.values().map(|c| c.participants.len()).collect();
        assert_eq!(counts, vec![1, 0, 0]);
    }

    #[test]
    fn duplicate_rows_are_deduplicated() {
        let grid = Grid::from_rows([vec!["Иванов", "1"], vec!["Иванов", "1"]]);
        let mut columns = column_map(&grid, &[1]);
        scan_attendance(&grid, 0..=1, &mut columns);
        assert_eq!(columns.values().next().unwrap().participants.len(), 1);
    }

    #[test]
    fn unresolved_columns_are_ignored() {
        let grid = Grid::from_rows([vec!["Иванов", "1", "1"]]);
        let columns = column_map(&grid, &[2]);
        let regs = registrations(&grid, 0..=0, columns);
        assert_eq!(regs.len(), 1);
        assert_eq!(regs[0].column.index(), 2);
        assert_eq!(regs[0].participants, vec!["Иванов".to_string()]);
    }

    #[test]
    fn rows_outside_grid_are_harmless() {
        let grid = Grid::from_rows([vec!["Иванов", "1"]]);
        let regs = registrations(&grid, 0..=38, column_map(&grid, &[1]));
        assert_eq!(regs[0].participants.len(), 1);
    }
}

//! Fixed row layout of the crew sheet.
//!
//! Row positions are not discovered per sheet; a deployment pins them here.

use std::ops::RangeInclusive;

/// Trimmed cell value meaning "signed up for this column".
pub const PRESENCE_MARK: &str = "1";

/// Cell value written when a participant is removed from a column.
pub const ABSENCE_MARK: &str = "";

/// Zero-based row indices of the sheet blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Merged month labels.
    pub month_row: usize,
    /// Day-of-month numbers.
    pub day_row: usize,
    /// Stable trip ids, written by the sync.
    pub id_row: usize,
    /// Activity type codes.
    pub activity_row: usize,
    /// Participant attendance rows (first cell is the display name).
    pub participant_rows: RangeInclusive<usize>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            month_row: 0,
            day_row: 2,
            id_row: 4,
            activity_row: 5,
            participant_rows: 8..=38,
        }
    }
}

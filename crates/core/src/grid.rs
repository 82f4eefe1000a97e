//! Raw spreadsheet grid and cell addressing.
//!
//! A [`Grid`] is the row-major snapshot of cell strings fetched once at the
//! start of a sync run. Columns are referred to through the opaque
//! [`ColumnKey`] handle so that parsing stages join on a typed key rather
//! than a bare array index.

use std::fmt;

/// Row-major snapshot of a sheet. Rows may have different lengths; the
/// Sheets API trims trailing empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Build a grid from string slices. Mostly useful in tests.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of rows in the snapshot.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Row cells, or an empty slice when the row is absent.
    pub fn row(&self, row: usize) -> &[String] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell text, or `""` when the cell is outside the fetched range.
    pub fn cell(&self, row: usize, column: ColumnKey) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column.0))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Find the first column in `row` whose trimmed text equals `value`.
    pub fn find_in_row(&self, row: usize, value: &str) -> Option<ColumnKey> {
        self.row(row)
            .iter()
            .position(|cell| cell.trim() == value)
            .map(ColumnKey)
    }

    /// Find the first row in `rows` whose first cell, trimmed, equals `value`.
    pub fn find_in_first_column(
        &self,
        rows: impl IntoIterator<Item = usize>,
        value: &str,
    ) -> Option<usize> {
        rows.into_iter()
            .find(|&r| self.cell(r, ColumnKey::FIRST).trim() == value)
    }

    /// Overwrite a cell, padding the grid with empty cells as needed.
    pub fn set_cell(&mut self, row: usize, column: ColumnKey, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column.0 {
            cells.resize(column.0 + 1, String::new());
        }
        cells[column.0] = value.into();
    }

    /// Columns `[0, width)` as keys.
    pub fn columns(&self) -> impl Iterator<Item = ColumnKey> {
        (0..self.width()).map(ColumnKey)
    }
}

/// Opaque handle to a grid column.
///
/// Only this module mints keys, from positions that exist in a fetched grid
/// (or from a parsed A1 reference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnKey(usize);

impl ColumnKey {
    /// The name column of the participant block.
    pub const FIRST: ColumnKey = ColumnKey(0);

    /// Zero-based position, for logging and range arithmetic.
    pub fn index(self) -> usize {
        self.0
    }

    /// A1 column letters (`0 -> "A"`).
    pub fn letters(self) -> String {
        column_letter(self.0 + 1)
    }

    /// Keys for the inclusive span `[from, to]`.
    pub fn span(from: ColumnKey, to: ColumnKey) -> impl Iterator<Item = ColumnKey> {
        (from.0..=to.0).map(ColumnKey)
    }

    /// The key immediately to the left, if any.
    pub(crate) fn prev(self) -> Option<ColumnKey> {
        self.0.checked_sub(1).map(ColumnKey)
    }

    /// Key from a raw position. Only parsing code inside the crate uses this.
    pub(crate) fn at(index: usize) -> ColumnKey {
        ColumnKey(index)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.letters())
    }
}

/// Base-26 column letters for a 1-based column number.
///
/// `1 -> "A"`, `26 -> "Z"`, `27 -> "AA"`, `52 -> "AZ"`, `53 -> "BA"`.
/// Returns an empty string for `0`.
pub fn column_letter(mut number: usize) -> String {
    let mut out = Vec::new();
    while number > 0 {
        let rem = (number - 1) % 26;
        out.push(b'A' + rem as u8);
        number = (number - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Inverse of [`column_letter`]. Returns `None` for empty or non-letter input.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut number: usize = 0;
    for b in letters.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let v = (b.to_ascii_uppercase() - b'A') as usize + 1;
        number = number.checked_mul(26)?.checked_add(v)?;
    }
    Some(number)
}

/// A single-cell reference in `<sheet>!<Letters><Row1>` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub column: ColumnKey,
    /// Zero-based row.
    pub row: usize,
}

impl CellRange {
    pub fn new(sheet: impl Into<String>, column: ColumnKey, row: usize) -> Self {
        Self {
            sheet: sheet.into(),
            column,
            row,
        }
    }

    /// Parse `Sheet!B5`. The sheet name may itself contain `!`; the last one
    /// separates the cell reference.
    pub fn parse(range: &str) -> Option<Self> {
        let (sheet, cell) = range.rsplit_once('!')?;
        let split = cell.find(|c: char| c.is_ascii_digit())?;
        let (letters, digits) = cell.split_at(split);
        let column = column_number(letters)?;
        let row: usize = digits.parse().ok()?;
        if row == 0 {
            return None;
        }
        Some(Self {
            sheet: sheet.to_string(),
            column: ColumnKey(column - 1),
            row: row - 1,
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", self.sheet, self.column.letters(), self.row + 1)
    }
}

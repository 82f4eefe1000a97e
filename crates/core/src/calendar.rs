//! Month-name lookup and date composition for sheet columns.

use chrono::NaiveDate;

/// Month labels as they appear in the sheet header (lower-cased).
const MONTHS: &[(&str, u32)] = &[
    ("январь", 1),
    ("февраль", 2),
    ("март", 3),
    ("апрель", 4),
    ("май", 5),
    ("июнь", 6),
    ("июль", 7),
    ("август", 8),
    ("сентябрь", 9),
    ("октябрь", 10),
    ("ноябрь", 11),
    ("декабрь", 12),
];

/// Resolve a month label to its number (1-12). Case-insensitive, trimmed.
pub fn month_number(label: &str) -> Option<u32> {
    let label = label.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, number)| *number)
}

/// Parse a day-of-month cell. Accepts `1..=31` only.
pub fn parse_day(cell: &str) -> Option<u32> {
    let day: u32 = cell.trim().parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Compose a calendar date. `None` for impossible dates such as 31 February.
pub fn compose_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

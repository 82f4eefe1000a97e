/// Crew members are keyed by their Telegram user id (PostgreSQL BIGINT).
pub type UserId = i64;

/// Trip ids are the stable ids written into the spreadsheet id row.
pub type TripId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

use std::time::Duration;

use chrono::FixedOffset;
use orion_core::layout::GridLayout;
use orion_core::trip_builder::{offset_from_hours, TripDefaults, DEFAULT_BOATSWAINS, DEFAULT_VESSEL};

/// Default interval between scheduled sync runs.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(300);

/// Deployment settings of the sync pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Year every sheet date belongs to. The sheet carries no year.
    pub year: i32,
    /// Tab name used when addressing cells for write-back.
    pub sheet_name: String,
    /// Row layout of the sheet.
    pub layout: GridLayout,
    /// Vessel, boatswain overrides and local offset for built trips.
    pub defaults: TripDefaults,
    /// Period of the background sync.
    pub interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            sheet_name: "Лист1".to_string(),
            layout: GridLayout::default(),
            defaults: TripDefaults::default(),
            interval: DEFAULT_SYNC_INTERVAL,
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default            |
    /// |--------------------------|--------------------|
    /// | `SHEET_YEAR`             | `2025`             |
    /// | `SHEET_NAME`             | `Лист1`            |
    /// | `SHEET_UTC_OFFSET_HOURS` | `3`                |
    /// | `TRIP_VESSEL`            | `Orion`            |
    /// | `BOATSWAIN_NAMES`        | `Курочкина Ольга`  |
    /// | `SYNC_INTERVAL_SECS`     | `300`              |
    ///
    /// `BOATSWAIN_NAMES` is a comma-separated list.
    pub fn from_env() -> Self {
        let year: i32 = std::env::var("SHEET_YEAR")
            .unwrap_or_else(|_| "2025".into())
            .parse()
            .expect("SHEET_YEAR must be a valid i32");

        let sheet_name = std::env::var("SHEET_NAME").unwrap_or_else(|_| "Лист1".into());

        let offset_hours: i32 = std::env::var("SHEET_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("SHEET_UTC_OFFSET_HOURS must be a valid i32");

        let vessel = std::env::var("TRIP_VESSEL").unwrap_or_else(|_| DEFAULT_VESSEL.into());

        let boatswains: Vec<String> = std::env::var("BOATSWAIN_NAMES")
            .unwrap_or_else(|_| DEFAULT_BOATSWAINS.join(","))
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let interval_secs: u64 = std::env::var("SYNC_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SYNC_INTERVAL.as_secs().to_string())
            .parse()
            .expect("SYNC_INTERVAL_SECS must be a valid u64");

        Self {
            year,
            sheet_name,
            layout: GridLayout::default(),
            defaults: TripDefaults {
                vessel,
                boatswains,
                utc_offset: offset_from_hours(offset_hours),
            },
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.defaults.utc_offset
    }
}

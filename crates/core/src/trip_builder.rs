//! Registration to trip record conversion.

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

use crate::activity::{CrewRole, TripStatus, TripType};
use crate::attendance::ActivityRegistration;
use crate::identity::IdentityTable;
use crate::types::{Timestamp, TripId, UserId};

/// Names that always sign up as boatswain.
pub const DEFAULT_BOATSWAINS: &[&str] = &["Курочкина Ольга"];

/// Vessel every sheet trip is assigned to.
pub const DEFAULT_VESSEL: &str = "Orion";

/// Deployment constants applied to every built trip.
#[derive(Debug, Clone)]
pub struct TripDefaults {
    pub vessel: String,
    pub boatswains: Vec<String>,
    /// Offset in which the sheet's dates and schedule times are meant.
    pub utc_offset: FixedOffset,
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self {
            vessel: DEFAULT_VESSEL.to_string(),
            boatswains: DEFAULT_BOATSWAINS.iter().map(|s| s.to_string()).collect(),
            utc_offset: offset_from_hours(3),
        }
    }
}

/// Fixed offset for a whole number of hours east of UTC. Out-of-range input
/// falls back to UTC.
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

impl TripDefaults {
    /// Role for a display name.
    pub fn role_for(&self, name: &str) -> CrewRole {
        let name = name.trim();
        if self.boatswains.iter().any(|b| b.trim() == name) {
            CrewRole::Boatswain
        } else {
            CrewRole::Crew
        }
    }

    /// Departure instant for a date and local departure time.
    pub fn departure_instant(&self, date: NaiveDate, time: NaiveTime) -> Option<Timestamp> {
        date.and_time(time)
            .and_local_timezone(self.utc_offset)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Status of a trip on `date`: `planned` only while the local start of
    /// that day is still ahead of `now`.
    pub fn status_on(&self, date: NaiveDate, now: Timestamp) -> TripStatus {
        self.departure_instant(date, NaiveTime::MIN)
            .map_or(TripStatus::Completed, |day_start| status_at(day_start, now))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewMember {
    pub user_id: UserId,
    pub name: String,
    pub role: CrewRole,
}

/// A trip as derived from the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub trip_type: TripType,
    pub date: NaiveDate,
    pub departure_time: NaiveTime,
    pub departure: Timestamp,
    pub duration: Duration,
    pub vessel: String,
    pub status: TripStatus,
    pub crew: Vec<CrewMember>,
}

/// `planned` while `start` is strictly after `now`, otherwise `completed`.
pub fn status_at(start: Timestamp, now: Timestamp) -> TripStatus {
    if start > now {
        TripStatus::Planned
    } else {
        TripStatus::Completed
    }
}

/// Build trips from registrations, sorted by date.
///
/// Unknown activity codes drop the column; unresolvable names drop only the
/// participant.
pub fn build_trips(
    registrations: Vec<ActivityRegistration>,
    identities: &IdentityTable,
    defaults: &TripDefaults,
    now: Timestamp,
) -> Vec<Trip> {
    let mut trips: Vec<Trip> = registrations
        .into_iter()
        .filter_map(|reg| build_trip(reg, identities, defaults, now))
        .collect();
    trips.sort_by_key(|t| t.date);
    trips
}

fn build_trip(
    reg: ActivityRegistration,
    identities: &IdentityTable,
    defaults: &TripDefaults,
    now: Timestamp,
) -> Option<Trip> {
    let Some(trip_type) = TripType::from_code(&reg.activity_code) else {
        tracing::warn!(
            column = %reg.column,
            code = %reg.activity_code,
            "Unknown activity code, skipping column",
        );
        return None;
    };

    let schedule = trip_type.schedule();
    let Some(departure) = defaults.departure_instant(reg.date, schedule.departure) else {
        tracing::warn!(column = %reg.column, date = %reg.date, "Ambiguous local departure time");
        return None;
    };

    let crew = reg
        .participants
        .into_iter()
        .filter_map(|name| match identities.user_id_for(&name) {
            Some(user_id) => Some(CrewMember {
                user_id,
                role: defaults.role_for(&name),
                name,
            }),
            None => {
                tracing::warn!(trip_id = %reg.id, name = %name, "Unknown participant name");
                None
            }
        })
        .collect();

    Some(Trip {
        id: reg.id,
        trip_type,
        date: reg.date,
        departure_time: schedule.departure,
        departure,
        duration: schedule.duration,
        vessel: defaults.vessel.clone(),
        status: defaults.status_on(reg.date, now),
        crew,
    })
}

//! Trip types, statuses, crew roles and their fixed lookup tables.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Trip type
// ---------------------------------------------------------------------------

/// Kind of outing a sheet column describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TripType {
    MorningTraining,
    Training,
    TrainingRace,
    Race,
    Trip,
    Commercial,
    Ladoga,
}

impl TripType {
    /// Return the type name as stored in the database and sent to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MorningTraining => "morningTraining",
            Self::Training => "training",
            Self::TrainingRace => "trainingRace",
            Self::Race => "race",
            Self::Trip => "trip",
            Self::Commercial => "commercial",
            Self::Ladoga => "ladoga",
        }
    }

    /// Parse a type name. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "morningTraining" => Some(Self::MorningTraining),
            "training" => Some(Self::Training),
            "trainingRace" => Some(Self::TrainingRace),
            "race" => Some(Self::Race),
            "trip" => Some(Self::Trip),
            "commercial" => Some(Self::Commercial),
            "ladoga" => Some(Self::Ladoga),
            _ => None,
        }
    }

    /// Map an activity code from the sheet's activity row.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "УТ" => Some(Self::MorningTraining),
            "Т" => Some(Self::Training),
            "ТГ" => Some(Self::TrainingRace),
            "Г" => Some(Self::Race),
            "П" => Some(Self::Trip),
            "К" => Some(Self::Commercial),
            "Л" => Some(Self::Ladoga),
            _ => None,
        }
    }

    /// Default departure time and duration for this type.
    pub fn schedule(&self) -> Schedule {
        let (h, m, minutes) = match self {
            Self::MorningTraining => (6, 0, 180),
            Self::Training => (19, 0, 180),
            Self::TrainingRace => (18, 30, 210),
            Self::Race => (10, 0, 480),
            Self::Trip => (8, 30, 600),
            Self::Commercial => (6, 30, 660),
            Self::Ladoga => (5, 0, 900),
        };
        Schedule {
            departure: NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN),
            duration: Duration::minutes(minutes),
        }
    }

    /// All valid type names.
    pub const ALL: &'static [&'static str] = &[
        "morningTraining",
        "training",
        "trainingRace",
        "race",
        "trip",
        "commercial",
        "ladoga",
    ];
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default timing of a trip type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub departure: NaiveTime,
    pub duration: Duration,
}

/// Render a duration as hours, e.g. `"3"` or `"3.5"`.
pub fn format_duration_hours(minutes: i32) -> String {
    if minutes % 60 == 0 {
        (minutes / 60).to_string()
    } else {
        let hours = f64::from(minutes) / 60.0;
        let text = format!("{hours:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

// ---------------------------------------------------------------------------
// Trip status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planned,
    Active,
    Completed,
    Canceled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(Self::Planned),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }

    pub const ALL: &'static [&'static str] = &["planned", "active", "completed", "canceled"];
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Crew role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    Captain,
    Boatswain,
    Crew,
}

impl CrewRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Captain => "captain",
            Self::Boatswain => "boatswain",
            Self::Crew => "crew",
        }
    }

    /// Parse a stored role. Unknown values fall back to [`CrewRole::Crew`].
    pub fn from_db(s: &str) -> Self {
        match s {
            "captain" => Self::Captain,
            "boatswain" => Self::Boatswain,
            _ => Self::Crew,
        }
    }

    /// Position shown on the trip card.
    pub fn position(&self) -> &'static str {
        match self {
            Self::Captain => "Капитан",
            Self::Boatswain => "Боцман",
            Self::Crew => "Матрос",
        }
    }
}

impl std::fmt::Display for CrewRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_type_round_trip() {
        for s in TripType::ALL {
            let t = TripType::from_str(s).unwrap();
            assert_eq!(t.as_str(), *s);
        }
    }

    #[test]
    fn trip_type_codes() {
        assert_eq!(TripType::from_code("УТ"), Some(TripType::MorningTraining));
        assert_eq!(TripType::from_code(" Т "), Some(TripType::Training));
        assert_eq!(TripType::from_code("ТГ"), Some(TripType::TrainingRace));
        assert_eq!(TripType::from_code("Г"), Some(TripType::Race));
        assert_eq!(TripType::from_code("П"), Some(TripType::Trip));
        assert_eq!(TripType::from_code("К"), Some(TripType::Commercial));
        assert_eq!(TripType::from_code("Л"), Some(TripType::Ladoga));
        assert_eq!(TripType::from_code("X"), None);
    }

    #[test]
    fn trip_type_serializes_camel_case() {
        let json = serde_json::to_string(&TripType::TrainingRace).unwrap();
        assert_eq!(json, "\"trainingRace\"");
    }

    #[test]
    fn training_schedule() {
        let s = TripType::Training.schedule();
        assert_eq!(s.departure, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        assert_eq!(s.duration, Duration::hours(3));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration_hours(180), "3");
        assert_eq!(format_duration_hours(210), "3.5");
        assert_eq!(format_duration_hours(200), "3.33");
    }

    #[test]
    fn status_round_trip() {
        for s in TripStatus::ALL {
            assert_eq!(TripStatus::from_str(s).unwrap().as_str(), *s);
        }
        assert!(TripStatus::from_str("cancelled").is_none());
    }

    #[test]
    fn unknown_role_is_crew() {
        assert_eq!(CrewRole::from_db("admiral"), CrewRole::Crew);
        assert_eq!(CrewRole::from_db("boatswain").position(), "Боцман");
    }
}

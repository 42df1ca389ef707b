use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "routine_type", rename_all = "lowercase")]
pub enum RoutineType {
    Weekday,
    Saturday,
    Sunday,
}

impl RoutineType {
    pub const ALL: [RoutineType; 3] = [RoutineType::Weekday, RoutineType::Saturday, RoutineType::Sunday];

    pub fn as_str(self) -> &'static str {
        match self {
            RoutineType::Weekday => "weekday",
            RoutineType::Saturday => "saturday",
            RoutineType::Sunday => "sunday",
        }
    }
}

impl fmt::Display for RoutineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutineType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoutineType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::new(format!("Unknown routine type '{}'", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleEntry {
    pub time: String,
    pub activity: String,
    pub details: String,
    pub duration: String,
}

impl ScheduleEntry {
    pub fn new(time: &str, activity: &str, details: &str, duration: &str) -> Self {
        Self {
            time: time.to_string(),
            activity: activity.to_string(),
            details: details.to_string(),
            duration: duration.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    #[serde(rename = "type")]
    pub routine_type: RoutineType,
    pub schedule: Vec<ScheduleEntry>,
    pub updated_at: DateTime<Utc>,
}

/// Fixed three-key view of every routine; missing categories read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineMap {
    pub weekday: Vec<ScheduleEntry>,
    pub saturday: Vec<ScheduleEntry>,
    pub sunday: Vec<ScheduleEntry>,
}

impl RoutineMap {
    pub fn from_routines(routines: Vec<Routine>) -> Self {
        let mut map = Self::default();
        for routine in routines {
            *map.slot_mut(routine.routine_type) = routine.schedule;
        }
        map
    }

    fn slot_mut(&mut self, routine_type: RoutineType) -> &mut Vec<ScheduleEntry> {
        match routine_type {
            RoutineType::Weekday => &mut self.weekday,
            RoutineType::Saturday => &mut self.saturday,
            RoutineType::Sunday => &mut self.sunday,
        }
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purpose of a duty shift. Closed set, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftCategory {
    Standby,
    OnDuty,
    OffDuty,
    Training,
}

impl ShiftCategory {
    pub const ALL: [ShiftCategory; 4] = [
        ShiftCategory::Standby,
        ShiftCategory::OnDuty,
        ShiftCategory::OffDuty,
        ShiftCategory::Training,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCategory::Standby => "STANDBY",
            ShiftCategory::OnDuty => "ON_DUTY",
            ShiftCategory::OffDuty => "OFF_DUTY",
            ShiftCategory::Training => "TRAINING",
        }
    }

    /// Human label used in calendar titles ("ON_DUTY" -> "ON DUTY").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShiftCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDBY" => Ok(ShiftCategory::Standby),
            "ON_DUTY" => Ok(ShiftCategory::OnDuty),
            "OFF_DUTY" => Ok(ShiftCategory::OffDuty),
            "TRAINING" => Ok(ShiftCategory::Training),
            _ => Err(anyhow::anyhow!("Unknown shift category: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecurrenceFrequency {
    #[default]
    None,
    Weekly,
}

impl std::str::FromStr for RecurrenceFrequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RecurrenceFrequency::None),
            "weekly" => Ok(RecurrenceFrequency::Weekly),
            _ => Err(anyhow::anyhow!("Unknown recurrence frequency: {s}")),
        }
    }
}

/// Set of weekdays selected for a weekly pattern.
///
/// Day numbers follow the 0 = Sunday .. 6 = Saturday convention
/// (`Weekday::num_days_from_sunday`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Build a set from 0..=6 day numbers. Returns the first out-of-range number on failure.
    pub fn from_day_numbers(days: &[i64]) -> Result<Self, i64> {
        let mut bits = 0u8;
        for &day in days {
            if !(0..=6).contains(&day) {
                return Err(day);
            }
            bits |= 1 << day;
        }
        Ok(WeekdaySet(bits))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    /// Selected day numbers in ascending order.
    pub fn day_numbers(&self) -> Vec<u8> {
        (0..7u8).filter(|d| self.0 & (1 << *d) != 0).collect()
    }
}

/// Body for POST /shifts.
///
/// Values arrive as plain text and numbers and are parsed by the validator,
/// so a missing or malformed value is reported against the field that holds it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateShiftRequest {
    /// Owner of the shift; defaults to the authenticated caller.
    pub user_id: Option<Uuid>,
    /// YYYY-MM-DD
    pub date_start: Option<String>,
    /// HH:MM or HH:MM:SS
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    /// STANDBY, ON_DUTY, OFF_DUTY or TRAINING
    pub category: Option<String>,
    pub description: Option<String>,
    pub group_label: Option<String>,
    /// "none" (default) or "weekly"
    pub recurrence_frequency: Option<String>,
    /// Weekday numbers, 0 = Sunday .. 6 = Saturday.
    #[serde(default)]
    pub recurrence_days: Vec<i64>,
    pub recurrence_until: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Once,
    Weekly { weekdays: WeekdaySet, until: NaiveDate },
}

/// A validated pattern, ready for expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrencePattern {
    pub user_id: Uuid,
    pub date_start: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub category: ShiftCategory,
    pub description: Option<String>,
    pub group_label: Option<String>,
    pub recurrence: Recurrence,
}

/// One expanded occurrence, shaped for bulk insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewShiftOccurrence {
    pub user_id: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub category: ShiftCategory,
    pub description: Option<String>,
    pub group_label: Option<String>,
    pub recurring_group_id: Option<Uuid>,
}

impl NewShiftOccurrence {
    pub fn into_persisted(self, id: Uuid, created_at: DateTime<Utc>) -> ShiftOccurrence {
        ShiftOccurrence {
            id,
            user_id: self.user_id,
            date_start: self.date_start,
            date_end: self.date_end,
            time_start: self.time_start,
            time_end: self.time_end,
            category: self.category,
            description: self.description,
            group_label: self.group_label,
            recurring_group_id: self.recurring_group_id,
            assignee_name: None,
            created_at,
        }
    }
}

/// A persisted occurrence as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftOccurrence {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub time_start: NaiveTime,
    pub time_end: NaiveTime,
    pub category: ShiftCategory,
    pub description: Option<String>,
    pub group_label: Option<String>,
    pub recurring_group_id: Option<Uuid>,
    /// Display name of the owner, when the store knows it.
    pub assignee_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Display-ready calendar entry. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent<'a> {
    pub id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    pub color: &'static str,
    pub category: ShiftCategory,
    pub shift: &'a ShiftOccurrence,
}

/// Query params for GET /shifts/calendar (inclusive date range).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CalendarRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

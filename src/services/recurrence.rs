use chrono::{Datelike, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{
    error::ShiftError,
    models::shift::{
        CreateShiftRequest, NewShiftOccurrence, Recurrence, RecurrenceFrequency,
        RecurrencePattern, ShiftCategory, WeekdaySet,
    },
    services::group_ids::GroupIdAllocator,
};

/// Inclusive, lazily evaluated range of calendar days.
///
/// Days are naive calendar dates: no timezone is consulted, the caller's
/// dates are taken as the owner's wall-clock calendar.
#[derive(Debug, Clone)]
pub struct DateRange {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl DateRange {
    pub fn inclusive(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            next: (first <= last).then_some(first),
            last,
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|d| *d <= self.last);
        Some(current)
    }
}

/// Longest span, in calendar days counted inclusively, a weekly pattern may cover.
pub const MAX_RECURRENCE_DAYS: i64 = 366;

fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
    message: &'static str,
) -> Result<&'a str, ShiftError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ShiftError::validation(field, message))
}

fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, ShiftError> {
    value.parse::<NaiveDate>().map_err(|_| {
        ShiftError::validation(field, format!("Invalid date '{value}': expected YYYY-MM-DD"))
    })
}

fn parse_time(value: &str, field: &'static str) -> Result<NaiveTime, ShiftError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            ShiftError::validation(field, format!("Invalid time '{value}': expected HH:MM or HH:MM:SS"))
        })
}

fn parse_category(value: &str) -> Result<ShiftCategory, ShiftError> {
    value.parse().map_err(|_| {
        let allowed: Vec<&str> = ShiftCategory::ALL.iter().map(|c| c.as_str()).collect();
        ShiftError::validation(
            "category",
            format!("Unknown shift category '{value}': expected one of {}", allowed.join(", ")),
        )
    })
}

fn parse_frequency(value: Option<&str>) -> Result<RecurrenceFrequency, ShiftError> {
    match value.map(str::trim) {
        None | Some("") => Ok(RecurrenceFrequency::None),
        Some(text) => text.parse().map_err(|_| {
            ShiftError::validation(
                "recurrence_frequency",
                format!("Unknown recurrence frequency '{text}': expected none or weekly"),
            )
        }),
    }
}

/// Check a raw request and turn it into a pattern the expander can trust.
///
/// `caller` becomes the owner when the request does not name one.
pub fn validate(req: &CreateShiftRequest, caller: Uuid) -> Result<RecurrencePattern, ShiftError> {
    let date_start = required(&req.date_start, "date_start", "A start date is required")
        .and_then(|v| parse_date(v, "date_start"))?;
    let time_start = required(&req.time_start, "time_start", "A start time is required")
        .and_then(|v| parse_time(v, "time_start"))?;
    let time_end = required(&req.time_end, "time_end", "An end time is required")
        .and_then(|v| parse_time(v, "time_end"))?;
    let category = required(&req.category, "category", "A shift category is required")
        .and_then(parse_category)?;

    let recurrence = match parse_frequency(req.recurrence_frequency.as_deref())? {
        RecurrenceFrequency::None => Recurrence::Once,
        RecurrenceFrequency::Weekly => {
            let until = required(
                &req.recurrence_until,
                "recurrence_until",
                "An end date is required for a recurring shift",
            )
            .and_then(|v| parse_date(v, "recurrence_until"))?;
            if until < date_start {
                return Err(ShiftError::validation(
                    "recurrence_until",
                    "The recurrence end date cannot be before the start date",
                ));
            }
            if (until - date_start).num_days() >= MAX_RECURRENCE_DAYS {
                return Err(ShiftError::validation(
                    "recurrence_until",
                    format!("A recurring shift can cover at most {MAX_RECURRENCE_DAYS} days"),
                ));
            }
            if req.recurrence_days.is_empty() {
                return Err(ShiftError::validation(
                    "recurrence_days",
                    "Select at least one weekday for a recurring shift",
                ));
            }
            let weekdays = WeekdaySet::from_day_numbers(&req.recurrence_days).map_err(|day| {
                ShiftError::validation(
                    "recurrence_days",
                    format!("Invalid weekday {day}: expected 0 (Sunday) to 6 (Saturday)"),
                )
            })?;
            Recurrence::Weekly { weekdays, until }
        }
    };

    Ok(RecurrencePattern {
        user_id: req.user_id.unwrap_or(caller),
        date_start,
        time_start,
        time_end,
        category,
        description: req.description.clone(),
        group_label: req.group_label.clone(),
        recurrence,
    })
}

fn occurrence_on(
    pattern: &RecurrencePattern,
    date: NaiveDate,
    recurring_group_id: Option<Uuid>,
) -> NewShiftOccurrence {
    NewShiftOccurrence {
        user_id: pattern.user_id,
        date_start: date,
        date_end: date,
        time_start: pattern.time_start,
        time_end: pattern.time_end,
        category: pattern.category,
        description: pattern.description.clone(),
        group_label: pattern.group_label.clone(),
        recurring_group_id,
    }
}

/// Enumerate the concrete occurrences of a pattern, in ascending date order.
///
/// Weekly patterns draw exactly one group id from `group_ids`; single shifts draw none.
/// A weekly pattern whose weekdays never fall in range yields an empty list.
pub fn expand(pattern: &RecurrencePattern, group_ids: &dyn GroupIdAllocator) -> Vec<NewShiftOccurrence> {
    match pattern.recurrence {
        Recurrence::Once => vec![occurrence_on(pattern, pattern.date_start, None)],
        Recurrence::Weekly { weekdays, until } => {
            let group_id = group_ids.next_group_id();
            DateRange::inclusive(pattern.date_start, until)
                .filter(|day| weekdays.contains(day.weekday()))
                .map(|day| occurrence_on(pattern, day, Some(group_id)))
                .collect()
        }
    }
}

/// Same as [`expand`], but an empty expansion is an error: nothing would be persisted.
pub fn expand_non_empty(
    pattern: &RecurrencePattern,
    group_ids: &dyn GroupIdAllocator,
) -> Result<Vec<NewShiftOccurrence>, ShiftError> {
    let occurrences = expand(pattern, group_ids);
    if occurrences.is_empty() {
        return Err(ShiftError::EmptyResult);
    }
    Ok(occurrences)
}

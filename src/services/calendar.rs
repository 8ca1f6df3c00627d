use crate::models::shift::{CalendarEvent, ShiftCategory, ShiftOccurrence};

pub const STANDBY_COLOR: &str = "#f59e0b";
pub const ON_DUTY_COLOR: &str = "#16a34a";
pub const OFF_DUTY_COLOR: &str = "#6b7280";
pub const TRAINING_COLOR: &str = "#2563eb";

/// Fixed display color per category.
///
/// The match is exhaustive: a category added without a color does not compile.
pub fn category_color(category: ShiftCategory) -> &'static str {
    match category {
        ShiftCategory::Standby => STANDBY_COLOR,
        ShiftCategory::OnDuty => ON_DUTY_COLOR,
        ShiftCategory::OffDuty => OFF_DUTY_COLOR,
        ShiftCategory::Training => TRAINING_COLOR,
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// "ON DUTY — Jane Doe (Night cover)", dropping the parts that are unknown.
pub fn shift_title(shift: &ShiftOccurrence) -> String {
    let mut title = shift.category.label();
    if let Some(name) = present(shift.assignee_name.as_deref()) {
        title.push_str(" — ");
        title.push_str(name);
    }
    if let Some(description) = present(shift.description.as_deref()) {
        title.push_str(" (");
        title.push_str(description);
        title.push(')');
    }
    title
}

/// Map persisted occurrences to calendar events, one per occurrence, same order.
/// Times are carried through as wall-clock values.
pub fn project(shifts: &[ShiftOccurrence]) -> Vec<CalendarEvent<'_>> {
    shifts
        .iter()
        .map(|shift| CalendarEvent {
            id: shift.id,
            start: shift.date_start.and_time(shift.time_start),
            end: shift.date_end.and_time(shift.time_end),
            title: shift_title(shift),
            color: category_color(shift.category),
            category: shift.category,
            shift,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn shift(category: ShiftCategory, assignee: Option<&str>, description: Option<&str>) -> ShiftOccurrence {
        ShiftOccurrence {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date_start: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            date_end: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            time_start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            time_end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            category,
            description: description.map(String::from),
            group_label: None,
            recurring_group_id: None,
            assignee_name: assignee.map(String::from),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_every_category_has_a_distinct_color() {
        let colors: HashSet<_> = ShiftCategory::ALL.iter().map(|c| category_color(*c)).collect();
        assert_eq!(colors.len(), ShiftCategory::ALL.len());
    }

    #[test]
    fn test_title_segments() {
        assert_eq!(shift_title(&shift(ShiftCategory::OnDuty, None, None)), "ON DUTY");
        assert_eq!(
            shift_title(&shift(ShiftCategory::OnDuty, Some("Jane Doe"), None)),
            "ON DUTY — Jane Doe"
        );
        assert_eq!(
            shift_title(&shift(ShiftCategory::Standby, None, Some("Hangar 2"))),
            "STANDBY (Hangar 2)"
        );
        assert_eq!(
            shift_title(&shift(ShiftCategory::OffDuty, Some("Jane Doe"), Some("Rest day"))),
            "OFF DUTY — Jane Doe (Rest day)"
        );
    }

    #[test]
    fn test_blank_segments_are_omitted() {
        assert_eq!(shift_title(&shift(ShiftCategory::Training, Some("  "), Some(""))), "TRAINING");
    }

    #[test]
    fn test_training_event_window_and_title() {
        let shifts = vec![shift(ShiftCategory::Training, None, None)];
        let events = project(&shifts);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert!(event.title.starts_with("TRAINING"));
        assert_eq!(event.id, shifts[0].id);
        assert_eq!(event.start.to_string(), "2026-02-01 10:00:00");
        assert_eq!(event.end.to_string(), "2026-02-01 14:00:00");
        assert_eq!(event.color, TRAINING_COLOR);
        assert!(std::ptr::eq(event.shift, &shifts[0]));
    }

    #[test]
    fn test_off_duty_color_ignores_text_content() {
        let shifts = vec![
            shift(ShiftCategory::OffDuty, None, None),
            shift(ShiftCategory::OffDuty, Some("Sam Lee"), Some("ON_DUTY swap")),
            shift(ShiftCategory::OffDuty, Some("Training lead"), Some("TRAINING")),
        ];
        assert!(project(&shifts).iter().all(|e| e.color == OFF_DUTY_COLOR));
    }

    #[test]
    fn test_projection_is_order_preserving_and_repeatable() {
        let shifts = vec![
            shift(ShiftCategory::Standby, Some("A"), None),
            shift(ShiftCategory::OnDuty, None, Some("B")),
            shift(ShiftCategory::Training, Some("C"), Some("D")),
        ];
        let first = project(&shifts);
        let second = project(&shifts);
        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|e| e.id).collect();
        let expected: Vec<_> = shifts.iter().map(|s| s.id).collect();
        assert_eq!(ids, expected);
    }
}

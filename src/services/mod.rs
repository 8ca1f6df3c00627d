pub mod calendar;
pub mod group_ids;
pub mod metrics;
pub mod recurrence;
pub mod shifts;

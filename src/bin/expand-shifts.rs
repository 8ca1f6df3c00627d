//! Preview how a shift pattern expands, without touching the database.
//!
//! Usage: expand-shifts --date 2026-01-05 --start 08:00 --end 16:00 --category ON_DUTY \
//!            [--weekly --days 1,3 --until 2026-01-31] [--description TEXT] [--label TEXT]
//!
//! Weekdays are numbered 0 (Sunday) to 6 (Saturday).

use chrono::{NaiveDate, NaiveTime};
use clap::Parser;
use serde_json::json;
use uuid::Uuid;

use fleetops_api::{
    db::memory::MemoryShiftStore,
    models::shift::{CalendarRangeQuery, CreateShiftRequest, ShiftCategory},
    services::{calendar, group_ids::SequentialGroupIds, shifts::ShiftService},
};

#[derive(Parser)]
#[command(name = "expand-shifts", about = "Expand a shift pattern and print the resulting occurrences")]
struct Args {
    /// First (or only) day of the shift, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,

    /// Start time, HH:MM
    #[arg(long, value_parser = parse_time)]
    start: NaiveTime,

    /// End time, HH:MM
    #[arg(long, value_parser = parse_time)]
    end: NaiveTime,

    /// STANDBY, ON_DUTY, OFF_DUTY or TRAINING
    #[arg(long, value_parser = parse_category)]
    category: ShiftCategory,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    label: Option<String>,

    /// Repeat weekly on --days until --until
    #[arg(long)]
    weekly: bool,

    /// Comma-separated weekday numbers, 0 = Sunday .. 6 = Saturday
    #[arg(long, value_delimiter = ',')]
    days: Vec<i64>,

    /// Last day of the recurrence, YYYY-MM-DD (inclusive)
    #[arg(long)]
    until: Option<NaiveDate>,

    /// Also print the calendar events for the expanded occurrences
    #[arg(long)]
    calendar: bool,
}

fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| format!("invalid time '{s}': {e}"))
}

fn parse_category(s: &str) -> Result<ShiftCategory, String> {
    s.to_uppercase().parse().map_err(|e: anyhow::Error| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let owner = Uuid::nil();
    let req = CreateShiftRequest {
        user_id: Some(owner),
        date_start: Some(args.date.to_string()),
        time_start: Some(args.start.format("%H:%M:%S").to_string()),
        time_end: Some(args.end.format("%H:%M:%S").to_string()),
        category: Some(args.category.to_string()),
        description: args.description,
        group_label: args.label,
        recurrence_frequency: args.weekly.then(|| "weekly".to_string()),
        recurrence_days: args.days,
        recurrence_until: args.until.map(|d| d.to_string()),
    };

    let store = MemoryShiftStore::new();
    let occurrences = ShiftService::create(&store, &SequentialGroupIds::new(), &req, owner).await?;

    if args.calendar {
        let range = CalendarRangeQuery {
            from: args.date,
            to: args.until.unwrap_or(args.date).max(args.date),
        };
        let shifts = ShiftService::list_range(&store, owner, range).await?;
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "occurrences": occurrences,
                "events": calendar::project(&shifts),
            }))?
        );
    } else {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
    }

    Ok(())
}

//! `freetime` CLI: view and edit weekly availability from the command line.
//!
//! Works on a JSON snapshot holding everyone's busy intervals, friendships,
//! groups, and the display timezone.
//!
//! ## Usage
//!
//! ```sh
//! # This week's grid for "me", compared against confirmed friends
//! freetime grid -i snapshot.json --user me
//!
//! # Next week, compared against a group, 9 AM to 5 PM rows, as JSON
//! freetime grid -i snapshot.json --user me --offset 1 --group study \
//!     --start-hour 9 --end-hour 17 --format json
//!
//! # List concrete common free spans under the grid
//! freetime grid -i snapshot.json --user me --spans
//!
//! # Add a weekly busy block (writes the snapshot back)
//! freetime add -i snapshot.json --user me --title Lecture \
//!     --date 2026-03-16 --start 09:00 --end 10:30 --repeat weekly
//!
//! # Flip one hour cell, or delete a whole series
//! freetime toggle -i snapshot.json --user me --date 2026-03-17 --hour 14
//! freetime delete -i snapshot.json --user me --id <interval-id> --series
//!
//! # Print the label of the week three weeks back
//! freetime week --offset -3
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for engine detail.

mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use freetime_engine::context::{free_spans, render_week};
use freetime_engine::notify::MemorySink;
use freetime_engine::week::{local_instant, parse_timezone};
use freetime_engine::{
    BusyInterval, ComparisonContext, DeleteScope, GroupId, HourRange, IntervalId, Recurrence,
    Snapshot, ToggleOutcome, UserId, ViewContext, WeekWindow,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "freetime",
    version,
    about = "Find common free time with friends and groups"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the weekly availability grid
    Grid {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        #[command(flatten)]
        week: WeekArgs,
        /// Compare against this group instead of confirmed friends
        #[arg(long)]
        group: Option<String>,
        /// First displayed hour (0-23)
        #[arg(long, default_value_t = 8)]
        start_hour: u32,
        /// Last displayed hour, inclusive (0-23)
        #[arg(long, default_value_t = 22)]
        end_hour: u32,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Also list concrete common free spans
        #[arg(long)]
        spans: bool,
    },
    /// Print the label of a week
    Week {
        #[command(flatten)]
        week: WeekArgs,
        /// Timezone used to find "this week" (IANA name)
        #[arg(long, default_value = "UTC")]
        timezone: String,
    },
    /// Add busy time, expanding repeats
    Add {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Title of the busy block
        #[arg(long)]
        title: String,
        /// Local date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Local start time, HH:MM
        #[arg(long, value_parser = parse_clock)]
        start: NaiveTime,
        /// Local end time, HH:MM
        #[arg(long, value_parser = parse_clock)]
        end: NaiveTime,
        #[arg(long, value_enum, default_value_t = Repeat::None)]
        repeat: Repeat,
    },
    /// Delete busy time by id
    Delete {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Interval id
        #[arg(long)]
        id: String,
        /// Delete the whole recurring series the interval belongs to
        #[arg(long)]
        series: bool,
    },
    /// Flip one hour cell between busy and free
    Toggle {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Local date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// Hour of the day (0-23)
        #[arg(long)]
        hour: u32,
    },
}

#[derive(Args)]
struct SnapshotArgs {
    /// Snapshot JSON file
    #[arg(short, long)]
    input: String,
    /// Write the updated snapshot here instead of back to the input
    #[arg(short, long)]
    output: Option<String>,
    /// The user whose view this is
    #[arg(long)]
    user: String,
    /// Display timezone (IANA name); defaults to the snapshot's
    #[arg(long)]
    timezone: Option<String>,
}

#[derive(Args)]
struct WeekArgs {
    /// Any date in the week to show, YYYY-MM-DD (default: today)
    #[arg(long)]
    week: Option<NaiveDate>,
    /// Weeks to move from that week
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i32,
}

impl WeekArgs {
    fn resolve(&self, tz: Tz) -> Result<WeekWindow> {
        let base = match self.week {
            Some(date) => WeekWindow::containing_date(date, tz),
            None => WeekWindow::containing(Utc::now(), tz),
        };
        Ok(base.shift(self.offset)?)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Repeat {
    None,
    Daily,
    Weekly,
}

impl From<Repeat> for Recurrence {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::None => Recurrence::None,
            Repeat::Daily => Recurrence::Daily,
            Repeat::Weekly => Recurrence::Weekly,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Grid {
            snapshot: args,
            week,
            group,
            start_hour,
            end_hour,
            format,
            spans,
        } => {
            let snapshot = read_snapshot(&args.input)?;
            let tz = display_timezone(&args, &snapshot)?;
            let hours = HourRange::new(start_hour, end_hour).context("Invalid hour range")?;
            let comparison = match group {
                Some(id) => ComparisonContext::Group(GroupId::new(id)),
                None => ComparisonContext::Friends,
            };
            let ctx = ViewContext {
                current_user: UserId::new(args.user),
                week: week.resolve(tz)?,
                comparison,
                hours,
            };

            let grid = render_week(&ctx, &snapshot.schedules, &snapshot.directory)
                .context("Failed to compute availability grid")?;
            let free = if spans {
                Some(
                    free_spans(&ctx, &snapshot.schedules, &snapshot.directory)
                        .context("Failed to compute free spans")?,
                )
            } else {
                None
            };

            match format {
                Format::Text => {
                    print!("{}", render::grid_text(&grid));
                    if let Some(free) = &free {
                        println!();
                        print!("{}", render::spans_text(free, tz));
                    }
                }
                Format::Json => {
                    let value = serde_json::json!({
                        "label": grid.week.label(),
                        "grid": grid,
                        "spans": free,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
        }
        Commands::Week { week, timezone } => {
            let tz = parse_timezone(&timezone)?;
            println!("{}", week.resolve(tz)?.label());
        }
        Commands::Add {
            snapshot: args,
            title,
            date,
            start,
            end,
            repeat,
        } => {
            let sink = Arc::new(MemorySink::new());
            let mut snapshot = read_snapshot(&args.input)?;
            snapshot.schedules.set_notifications(Some(sink.clone()));
            let tz = display_timezone(&args, &snapshot)?;

            let interval = BusyInterval::new(
                UserId::new(args.user.clone()),
                title,
                local_instant(&tz, date.and_time(start)),
                local_instant(&tz, date.and_time(end)),
                repeat.into(),
            )
            .context("End time must be after start time")?;
            let ids = snapshot.schedules.add(interval, tz)?;

            write_snapshot(&args, &snapshot)?;
            report(&sink);
            for id in ids {
                println!("{}", id);
            }
        }
        Commands::Delete {
            snapshot: args,
            id,
            series,
        } => {
            let sink = Arc::new(MemorySink::new());
            let mut snapshot = read_snapshot(&args.input)?;
            snapshot.schedules.set_notifications(Some(sink.clone()));
            let scope = if series {
                DeleteScope::Series
            } else {
                DeleteScope::Single
            };

            let removed = snapshot
                .schedules
                .delete(&UserId::new(args.user.clone()), &IntervalId::new(id), scope)?;

            write_snapshot(&args, &snapshot)?;
            report(&sink);
            println!("Removed {} interval(s)", removed);
        }
        Commands::Toggle {
            snapshot: args,
            date,
            hour,
        } => {
            let mut snapshot = read_snapshot(&args.input)?;
            let tz = display_timezone(&args, &snapshot)?;

            let outcome =
                snapshot
                    .schedules
                    .toggle_slot(&UserId::new(args.user.clone()), date, hour, tz)?;

            write_snapshot(&args, &snapshot)?;
            match outcome {
                ToggleOutcome::Added(id) => println!("Marked busy: {}", id),
                ToggleOutcome::Removed(id) => println!("Marked free: {}", id),
            }
        }
    }

    Ok(())
}

fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {}", e))
}

fn display_timezone(args: &SnapshotArgs, snapshot: &Snapshot) -> Result<Tz> {
    match &args.timezone {
        Some(name) => Ok(parse_timezone(name)?),
        None => Ok(snapshot.tz()?),
    }
}

fn read_snapshot(path: &str) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path))?;
    let snapshot =
        Snapshot::from_json(&json).with_context(|| format!("Invalid snapshot: {}", path))?;
    tracing::debug!(path, users = snapshot.schedules.users().count(), "loaded snapshot");
    Ok(snapshot)
}

fn write_snapshot(args: &SnapshotArgs, snapshot: &Snapshot) -> Result<()> {
    let path = args.output.as_deref().unwrap_or(&args.input);
    let json = snapshot.to_json()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write snapshot: {}", path))
}

/// Echo collected notifications to stderr.
fn report(sink: &MemorySink) {
    for notification in sink.drain() {
        eprintln!("notice: {}", notification.message);
    }
}

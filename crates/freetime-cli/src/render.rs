//! Plain-text rendering of a classified week.

use std::fmt::Write;

use chrono_tz::Tz;
use freetime_engine::grid::{Grid, SlotClassification};
use freetime_engine::hours::format_hour;
use freetime_engine::week::DAYS_PER_WEEK;
use freetime_engine::FreeSpan;

const LABEL_WIDTH: usize = 6;
const COLUMN_WIDTH: usize = 10;

fn symbol(classification: SlotClassification) -> &'static str {
    match classification {
        SlotClassification::Busy => "#",
        SlotClassification::Available => ".",
        SlotClassification::CommonFree => "*",
    }
}

/// Week label, column headers, one row per displayed hour, and a legend.
pub fn grid_text(grid: &Grid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", grid.week.label());

    let _ = write!(out, "{:width$}", "", width = LABEL_WIDTH);
    for day in 0..DAYS_PER_WEEK {
        let header = grid.week.day_label(day).unwrap_or_default();
        let _ = write!(out, "{:>width$}", header, width = COLUMN_WIDTH);
    }
    out.push('\n');

    for hour in grid.hours.iter() {
        let _ = write!(out, "{:>width$}", format_hour(hour), width = LABEL_WIDTH);
        if let Some(row) = grid.row(hour) {
            for cell in row {
                let _ = write!(out, "{:>width$}", symbol(cell.classification), width = COLUMN_WIDTH);
            }
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "\n{} Available   {} Busy   {} Common Free Time   (compared with {})",
        symbol(SlotClassification::Available),
        symbol(SlotClassification::Busy),
        symbol(SlotClassification::CommonFree),
        match grid.comparison_size {
            1 => "1 schedule".to_string(),
            n => format!("{} schedules", n),
        }
    );
    out
}

/// One line per free span, in local time.
pub fn spans_text(spans: &[FreeSpan], tz: Tz) -> String {
    let mut out = String::new();
    if spans.is_empty() {
        out.push_str("No common free time this week.\n");
        return out;
    }
    for span in spans {
        let start = span.start.with_timezone(&tz);
        let end = span.end.with_timezone(&tz);
        let _ = writeln!(
            out,
            "{}  {} - {}  ({} min)",
            start.format("%a %-m/%-d"),
            start.format("%H:%M"),
            end.format("%H:%M"),
            span.duration_minutes
        );
    }
    out
}

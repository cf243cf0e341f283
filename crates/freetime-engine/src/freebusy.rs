//! Concrete common free spans inside a week's displayed hours.
//!
//! Where the grid answers "is this hour free for everyone", this module
//! answers "from when to when": all busy intervals of the owner and the
//! comparison set are merged per day, and the gaps inside each day's
//! displayed window are returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::hours::HourRange;
use crate::interval::{validate_all, BusyInterval};
use crate::week::WeekWindow;

/// A stretch of time nobody in the comparison is busy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl FreeSpan {
    fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            duration_minutes: (end - start).num_minutes(),
        }
    }
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of (start, end) intervals.
pub(crate) fn merge_busy_periods<'a>(
    intervals: impl Iterator<Item = &'a BusyInterval>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut clipped: Vec<(DateTime<Utc>, DateTime<Utc>)> = intervals
        .filter(|iv| iv.overlaps(window_start, window_end))
        .map(|iv| (iv.start.max(window_start), iv.end.min(window_end)))
        .collect();

    clipped.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for (start, end) in clipped {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Gaps between merged busy periods inside `[window_start, window_end)`.
fn gaps(
    merged: &[(DateTime<Utc>, DateTime<Utc>)],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<FreeSpan> {
    let mut free = Vec::new();
    let mut cursor = window_start;

    for &(busy_start, busy_end) in merged {
        if cursor < busy_start {
            free.push(FreeSpan::new(cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        free.push(FreeSpan::new(cursor, window_end));
    }

    free
}

/// Free spans shared by the owner and every comparison member, per day.
///
/// Each day contributes the gaps inside its displayed window, which runs from
/// `hours.start():00` to the end of the `hours.end()` row. Spans never cross
/// day boundaries and are returned in chronological order.
///
/// # Errors
/// Returns [`crate::GridError::InvalidInterval`] for any interval with
/// `end <= start`.
pub fn common_free_spans(
    owner: &[BusyInterval],
    comparison: &[Vec<BusyInterval>],
    week: &WeekWindow,
    hours: HourRange,
) -> Result<Vec<FreeSpan>> {
    validate_all(owner)?;
    for member in comparison {
        validate_all(member)?;
    }

    let mut spans = Vec::new();
    for date in week.days() {
        let (window_start, _) = week.hour_bounds(date, hours.start());
        let (_, window_end) = week.hour_bounds(date, hours.end());
        if window_start >= window_end {
            continue;
        }

        let everyone = owner.iter().chain(comparison.iter().flatten());
        let merged = merge_busy_periods(everyone, window_start, window_end);
        spans.extend(gaps(&merged, window_start, window_end));
    }

    Ok(spans)
}

/// First shared free span lasting at least `min_minutes`.
pub fn first_common_free_span(
    owner: &[BusyInterval],
    comparison: &[Vec<BusyInterval>],
    week: &WeekWindow,
    hours: HourRange,
    min_minutes: i64,
) -> Result<Option<FreeSpan>> {
    Ok(common_free_spans(owner, comparison, week, hours)?
        .into_iter()
        .find(|span| span.duration_minutes >= min_minutes))
}

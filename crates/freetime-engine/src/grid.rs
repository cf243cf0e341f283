//! The weekly availability grid.
//!
//! [`compute_week`] classifies every displayed hour of a [`WeekWindow`] as
//! [`SlotClassification::Busy`], [`SlotClassification::Available`], or
//! [`SlotClassification::CommonFree`], relative to the owner's own busy
//! intervals and the busy intervals of each comparison-set member.
//!
//! A cell is the local hour `[H:00, H+1:00)` on one day. An interval marks the
//! cell busy if it overlaps any part of that hour, so a 9:15–9:45 block makes
//! the whole 9 AM row busy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::hours::HourRange;
use crate::interval::{validate_all, BusyInterval};
use crate::week::{WeekWindow, DAYS_PER_WEEK};

/// Verdict for one (day, hour) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlotClassification {
    /// The owner has an interval overlapping this hour.
    Busy,
    /// The owner is free, but the comparison set is empty or someone in it is busy.
    Available,
    /// The owner and every member of a non-empty comparison set are free.
    CommonFree,
}

impl SlotClassification {
    /// Style class used by the rendering layer.
    pub fn css_class(&self) -> &'static str {
        match self {
            SlotClassification::Busy => "busy",
            SlotClassification::Available => "available",
            SlotClassification::CommonFree => "common-free",
        }
    }
}

/// One classified cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// 0 = Sunday … 6 = Saturday.
    pub day: usize,
    pub hour: u32,
    pub date: NaiveDate,
    pub classification: SlotClassification,
}

impl Cell {
    /// Whether the owner may click this cell to mark the hour busy.
    pub fn is_toggleable(&self) -> bool {
        self.classification != SlotClassification::Busy
    }
}

/// A dense week × hour grid of classifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    pub week: WeekWindow,
    pub hours: HourRange,
    /// Number of member schedules the owner was compared against.
    pub comparison_size: usize,
    /// Day-major: all hours of Sunday, then Monday, …
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RawGrid {
    week: WeekWindow,
    hours: HourRange,
    comparison_size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let expected = DAYS_PER_WEEK * raw.hours.len();
        if raw.cells.len() != expected {
            return Err(GridError::InvalidGrid(format!(
                "expected {} cells, got {}",
                expected,
                raw.cells.len()
            )));
        }
        let hours = raw.hours;
        let slots = raw
            .week
            .days()
            .into_iter()
            .enumerate()
            .flat_map(move |(day, date)| {
                (hours.start()..=hours.end()).map(move |hour| (day, hour, date))
            });
        for (cell, (day, hour, date)) in raw.cells.iter().zip(slots) {
            if (cell.day, cell.hour, cell.date) != (day, hour, date) {
                return Err(GridError::InvalidGrid(format!(
                    "cell {} {}:00 is out of place, expected day {} {}:00",
                    cell.date, cell.hour, day, hour
                )));
            }
        }
        Ok(Grid {
            week: raw.week,
            hours: raw.hours,
            comparison_size: raw.comparison_size,
            cells: raw.cells,
        })
    }
}

impl Grid {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All cells of one day (`0` = Sunday), in hour order.
    pub fn day(&self, day: usize) -> Option<&[Cell]> {
        let rows = self.hours.len();
        if day >= DAYS_PER_WEEK {
            return None;
        }
        self.cells.get(day * rows..(day + 1) * rows)
    }

    /// The seven cells of one hour row, Sunday first.
    pub fn row(&self, hour: u32) -> Option<Vec<&Cell>> {
        if !self.hours.contains(hour) {
            return None;
        }
        let offset = (hour - self.hours.start()) as usize;
        let rows = self.hours.len();
        (0..DAYS_PER_WEEK)
            .map(|day| self.cells.get(day * rows + offset))
            .collect()
    }

    pub fn get(&self, day: usize, hour: u32) -> Option<SlotClassification> {
        if day >= DAYS_PER_WEEK || !self.hours.contains(hour) {
            return None;
        }
        let index = day * self.hours.len() + (hour - self.hours.start()) as usize;
        self.cells.get(index).map(|cell| cell.classification)
    }

    pub fn count(&self, classification: SlotClassification) -> usize {
        self.cells
            .iter()
            .filter(|c| c.classification == classification)
            .count()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Whether any interval in `intervals` overlaps the slot `[start, end)`.
///
/// A slot that collapsed to a single instant (a local hour swallowed by a DST
/// gap) is tested as a point.
fn slot_busy(intervals: &[BusyInterval], start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    if start < end {
        intervals.iter().any(|iv| iv.overlaps(start, end))
    } else {
        intervals.iter().any(|iv| iv.covers(start))
    }
}

/// Classify every displayed hour of `week`.
///
/// `comparison` holds one interval list per comparison-set member; an empty
/// outer slice means the comparison set is empty and no cell can be
/// [`SlotClassification::CommonFree`]. Inputs need not be sorted.
///
/// # Errors
/// Returns [`crate::GridError::InvalidInterval`] if any interval has
/// `end <= start`. No grid is produced in that case.
pub fn compute_week(
    owner: &[BusyInterval],
    comparison: &[Vec<BusyInterval>],
    week: &WeekWindow,
    hours: HourRange,
) -> Result<Grid> {
    if let Err(e) = validate_all(owner).and_then(|_| {
        comparison
            .iter()
            .try_for_each(|member| validate_all(member))
    }) {
        tracing::warn!(error = %e, "rejected malformed interval");
        return Err(e);
    }

    // Intervals outside the week can never overlap a cell.
    let (week_start, week_end) = week.bounds();
    let in_week = |list: &[BusyInterval]| -> Vec<BusyInterval> {
        list.iter()
            .filter(|iv| iv.overlaps(week_start, week_end))
            .cloned()
            .collect()
    };
    let owner = in_week(owner);
    let members: Vec<Vec<BusyInterval>> = comparison.iter().map(|m| in_week(m)).collect();

    let mut cells = Vec::with_capacity(DAYS_PER_WEEK * hours.len());
    for (day, date) in week.days().into_iter().enumerate() {
        for hour in hours.iter() {
            let (start, end) = week.hour_bounds(date, hour);
            let classification = if slot_busy(&owner, start, end) {
                SlotClassification::Busy
            } else if !members.is_empty()
                && members.iter().all(|m| !slot_busy(m, start, end))
            {
                SlotClassification::CommonFree
            } else {
                SlotClassification::Available
            };
            cells.push(Cell {
                day,
                hour,
                date,
                classification,
            });
        }
    }

    let grid = Grid {
        week: *week,
        hours,
        comparison_size: comparison.len(),
        cells,
    };

    tracing::debug!(
        week = %week.anchor(),
        comparison_size = grid.comparison_size,
        busy = grid.count(SlotClassification::Busy),
        common_free = grid.count(SlotClassification::CommonFree),
        "computed availability grid"
    );

    Ok(grid)
}

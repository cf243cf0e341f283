//! The range of hours shown on each day of the grid.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Inclusive range of displayed hours, e.g. `8..=22` for 8 AM through the 10 PM row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHourRange")]
pub struct HourRange {
    start: u32,
    end: u32,
}

#[derive(Deserialize)]
struct RawHourRange {
    start: u32,
    end: u32,
}

impl TryFrom<RawHourRange> for HourRange {
    type Error = GridError;

    fn try_from(raw: RawHourRange) -> Result<Self> {
        HourRange::new(raw.start, raw.end)
    }
}

impl HourRange {
    /// # Errors
    /// Returns [`GridError::InvalidHourRange`] unless `start < end <= 23`.
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start >= end || end > 23 {
            return Err(GridError::InvalidHourRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of rows, counting both ends.
    pub fn len(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    // Never empty: construction requires start < end.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, hour: u32) -> bool {
        (self.start..=self.end).contains(&hour)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self { start: 8, end: 22 }
    }
}

/// Row label for an hour of the day: `"12 AM"`, `"9 AM"`, `"12 PM"`, `"3 PM"`.
pub fn format_hour(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h < 12 => format!("{} AM", h),
        h => format!("{} PM", h - 12),
    }
}
